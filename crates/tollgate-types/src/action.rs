//! numeric action ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// one action id, or an ordered list of ids checked with OR semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Actions {
    /// a single action id.
    One(i64),

    /// several action ids; holding any of them satisfies a check.
    Many(Vec<i64>),
}

impl Actions {
    /// the ids as a slice.
    pub fn ids(&self) -> &[i64] {
        match self {
            Actions::One(id) => std::slice::from_ref(id),
            Actions::Many(ids) => ids,
        }
    }

    /// the id when exactly one integer was given.
    ///
    /// a list is rejected even when it has one element: listing by several
    /// OR'd actions is not supported.
    pub fn single(&self) -> crate::Result<i64> {
        match self {
            Actions::One(id) => Ok(*id),
            Actions::Many(_) => Err(Error::NotSingleAction(self.clone())),
        }
    }

    /// whether no action ids were given at all.
    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}

impl From<i64> for Actions {
    fn from(id: i64) -> Self {
        Actions::One(id)
    }
}

impl From<Vec<i64>> for Actions {
    fn from(ids: Vec<i64>) -> Self {
        Actions::Many(ids)
    }
}

impl From<&[i64]> for Actions {
    fn from(ids: &[i64]) -> Self {
        Actions::Many(ids.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for Actions {
    fn from(ids: [i64; N]) -> Self {
        Actions::Many(ids.to_vec())
    }
}

impl fmt::Display for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actions::One(id) => write!(f, "{id}"),
            Actions::Many(ids) => {
                let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", ids.join(", "))
            }
        }
    }
}

/// parses `"3"` as [`Actions::One`] and `"3,4"` as [`Actions::Many`].
impl FromStr for Actions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| Error::InvalidAction(s.to_string()))
        };

        if s.contains(',') {
            let ids = s.split(',').map(parse).collect::<Result<Vec<_>, _>>()?;
            Ok(Actions::Many(ids))
        } else {
            Ok(Actions::One(parse(s)?))
        }
    }
}
