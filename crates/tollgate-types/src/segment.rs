//! segment ids partition grants.

use serde::{Deserialize, Serialize};

/// the partition a grant belongs to.
///
/// the same (actor, action, object) triple can be granted independently in
/// each segment, e.g. once per tenant. grants made in one segment are
/// invisible from every other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub i64);

impl SegmentId {
    /// the "no segment" sentinel stored when none was chosen.
    pub const UNSCOPED: SegmentId = SegmentId(-1);
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::UNSCOPED
    }
}

impl From<i64> for SegmentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unscoped() {
        assert_eq!(SegmentId::default(), SegmentId(-1));
        assert_eq!(SegmentId::default(), SegmentId::UNSCOPED);
        assert_ne!(SegmentId::from(4), SegmentId::UNSCOPED);
    }
}
