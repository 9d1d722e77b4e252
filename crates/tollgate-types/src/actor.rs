//! actor identities and actor sets.
//!
//! an [`Actor`] is one concrete identity that can hold grants. an [`ActorSet`]
//! is several identities acting as one principal (a user plus the groups it
//! belongs to, say): any grant held by any member counts.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// a single concrete identity, referenced by type and id.
///
/// the engine never dereferences an actor; it only compares the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Actor {
    /// actor type discriminator, e.g. `"User"` or `"Group"`.
    pub actor_type: String,

    /// actor id within its type.
    pub id: i64,
}

impl Actor {
    /// create an actor from a type and id.
    pub fn new(actor_type: impl Into<String>, id: i64) -> Self {
        Self {
            actor_type: actor_type.into(),
            id,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.actor_type, self.id)
    }
}

impl FromStr for Actor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (actor_type, id) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidActor(s.to_string()))?;
        if actor_type.is_empty() {
            return Err(Error::InvalidActor(s.to_string()));
        }
        let id = id
            .trim()
            .parse()
            .map_err(|_| Error::InvalidActor(s.to_string()))?;
        Ok(Self::new(actor_type.trim(), id))
    }
}

/// anything that can hold grants.
///
/// host applications implement this for their own user/group/organisation
/// types so they can be passed straight into queries and policies.
pub trait Identity {
    /// the identity this value grants and queries as.
    fn actor(&self) -> Actor;
}

impl Identity for Actor {
    fn actor(&self) -> Actor {
        self.clone()
    }
}

impl<T: Identity + ?Sized> Identity for &T {
    fn actor(&self) -> Actor {
        (**self).actor()
    }
}

/// anything with a numeric id, used for objects permissions are checked against.
pub trait Identifiable {
    /// the object's id.
    fn id(&self) -> i64;
}

impl Identifiable for i64 {
    fn id(&self) -> i64 {
        *self
    }
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn id(&self) -> i64 {
        (**self).id()
    }
}

/// a deduplicated set of actors whose grants are combined with OR.
///
/// ordering is irrelevant to results. an empty set is valid and holds no
/// permissions at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorSet {
    members: BTreeSet<Actor>,
}

impl ActorSet {
    /// create an empty actor set.
    pub fn new() -> Self {
        Self::default()
    }

    /// build a set from `(type, ids)` pairs, e.g. a map of type to id list.
    ///
    /// ```
    /// use tollgate_types::ActorSet;
    ///
    /// let set = ActorSet::from_pairs([("User", vec![7]), ("Group", vec![1, 2])]);
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn from_pairs<K, I>(pairs: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = i64>,
    {
        let mut set = Self::new();
        for (actor_type, ids) in pairs {
            let actor_type = actor_type.into();
            for id in ids {
                set.insert(Actor::new(actor_type.clone(), id));
            }
        }
        set
    }

    /// add one identity.
    pub fn with(mut self, actor_type: impl Into<String>, id: i64) -> Self {
        self.insert(Actor::new(actor_type, id));
        self
    }

    /// add several identities of the same type.
    pub fn with_ids(
        mut self,
        actor_type: impl Into<String>,
        ids: impl IntoIterator<Item = i64>,
    ) -> Self {
        let actor_type = actor_type.into();
        for id in ids {
            self.insert(Actor::new(actor_type.clone(), id));
        }
        self
    }

    /// insert an actor, returning false if it was already present.
    pub fn insert(&mut self, actor: Actor) -> bool {
        self.members.insert(actor)
    }

    /// whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// number of distinct identities.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// whether the given actor is a member.
    pub fn contains(&self, actor: &Actor) -> bool {
        self.members.contains(actor)
    }

    /// iterate members in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.members.iter()
    }

    /// members grouped by actor type, ids ascending.
    pub fn by_type(&self) -> BTreeMap<&str, Vec<i64>> {
        let mut grouped: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
        for actor in &self.members {
            grouped
                .entry(actor.actor_type.as_str())
                .or_default()
                .push(actor.id);
        }
        grouped
    }
}

impl From<Actor> for ActorSet {
    fn from(actor: Actor) -> Self {
        let mut set = Self::new();
        set.insert(actor);
        set
    }
}

impl FromIterator<Actor> for ActorSet {
    fn from_iter<I: IntoIterator<Item = Actor>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl Extend<Actor> for ActorSet {
    fn extend<I: IntoIterator<Item = Actor>>(&mut self, iter: I) {
        self.members.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ActorSet {
    type Item = &'a Actor;
    type IntoIter = std::collections::btree_set::Iter<'a, Actor>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl fmt::Display for ActorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.members.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", members.join(", "))
    }
}

/// caller-supplied identity input: one actor, or a set acting as one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// exactly one concrete identity.
    Single(Actor),

    /// several identities whose grants are OR'd.
    Set(ActorSet),
}

impl Principal {
    /// flatten into an actor set.
    pub fn into_actor_set(self) -> ActorSet {
        match self {
            Principal::Single(actor) => ActorSet::from(actor),
            Principal::Set(set) => set,
        }
    }
}

impl From<Actor> for Principal {
    fn from(actor: Actor) -> Self {
        Principal::Single(actor)
    }
}

impl From<ActorSet> for Principal {
    fn from(set: ActorSet) -> Self {
        Principal::Set(set)
    }
}

impl<T: Identity> From<&T> for Principal {
    fn from(value: &T) -> Self {
        Principal::Single(value.actor())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Single(actor) => actor.fmt(f),
            Principal::Set(set) => set.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_parse_and_display() {
        let actor: Actor = "User:7".parse().unwrap();
        assert_eq!(actor, Actor::new("User", 7));
        assert_eq!(actor.to_string(), "User:7");
    }

    #[test]
    fn test_actor_parse_namespaced_type() {
        let actor: Actor = "Admin::User:3".parse().unwrap();
        assert_eq!(actor.actor_type, "Admin::User");
        assert_eq!(actor.id, 3);
    }

    #[test]
    fn test_actor_parse_rejects_garbage() {
        assert!(matches!(
            "User".parse::<Actor>(),
            Err(Error::InvalidActor(_))
        ));
        assert!(matches!(
            ":7".parse::<Actor>(),
            Err(Error::InvalidActor(_))
        ));
        assert!(matches!(
            "User:seven".parse::<Actor>(),
            Err(Error::InvalidActor(_))
        ));
    }

    #[test]
    fn test_actor_set_deduplicates() {
        let set = ActorSet::new()
            .with("User", 7)
            .with("User", 7)
            .with_ids("Group", [1, 2, 1]);
        assert_eq!(set.len(), 3);
        assert!(set.contains(&Actor::new("Group", 2)));
    }

    #[test]
    fn test_actor_set_order_independent() {
        let a = ActorSet::from_pairs([("User", vec![7]), ("Group", vec![2, 1])]);
        let b = ActorSet::from_pairs([("Group", vec![1, 2]), ("User", vec![7])]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_actor_set_by_type() {
        let set = ActorSet::from_pairs([("Group", vec![3, 1]), ("User", vec![7])]);
        let grouped = set.by_type();
        assert_eq!(grouped.get("Group"), Some(&vec![1, 3]));
        assert_eq!(grouped.get("User"), Some(&vec![7]));
    }

    #[test]
    fn test_empty_actor_set_is_valid() {
        let set = ActorSet::from_pairs(Vec::<(String, Vec<i64>)>::new());
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "[]");
    }

    #[test]
    fn test_principal_flattens() {
        let single = Principal::from(Actor::new("User", 7));
        assert_eq!(single, Principal::Single(Actor::new("User", 7)));
        assert_eq!(single.into_actor_set().len(), 1);

        let set = Principal::from(ActorSet::new().with("User", 7).with("Group", 1));
        assert!(matches!(set, Principal::Set(_)));
        assert_eq!(set.into_actor_set().len(), 2);
    }
}
