//! named actions for a policy type.
//!
//! a registry maps action names onto numeric ids, split into general actions
//! and actions-on-object. the two tables are independent, so one name may be
//! both. each policy type builds its registry once:
//!
//! ```
//! use std::sync::LazyLock;
//! use tollgate_grants::ActionRegistry;
//!
//! static POSTS: LazyLock<ActionRegistry> = LazyLock::new(|| {
//!     ActionRegistry::builder()
//!         .general("view", 1)
//!         .on_object("view", 1)
//!         .on_object("edit", 2)
//!         .build()
//! });
//!
//! static ADMIN_POSTS: LazyLock<ActionRegistry> =
//!     LazyLock::new(|| ActionRegistry::extend(&POSTS).general("purge", 9).build());
//!
//! assert_eq!(ADMIN_POSTS.general("view"), Some(1));
//! assert_eq!(ADMIN_POSTS.on_object("view"), Some(1));
//! assert_eq!(POSTS.general("purge"), None);
//! ```

use std::collections::BTreeMap;

/// immutable name → id table for one policy type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRegistry {
    general: BTreeMap<String, i64>,
    on_object: BTreeMap<String, i64>,
}

impl ActionRegistry {
    /// start an empty registry.
    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder::default()
    }

    /// start from everything `parent` registers.
    pub fn extend(parent: &ActionRegistry) -> ActionRegistryBuilder {
        ActionRegistryBuilder {
            registry: parent.clone(),
        }
    }

    /// whether `name` is registered in either table.
    pub fn contains(&self, name: &str) -> bool {
        self.general.contains_key(name) || self.on_object.contains_key(name)
    }

    /// id of a general action.
    pub fn general(&self, name: &str) -> Option<i64> {
        self.general.get(name).copied()
    }

    /// id of an action-on-object.
    pub fn on_object(&self, name: &str) -> Option<i64> {
        self.on_object.get(name).copied()
    }

    /// general actions, by name.
    pub fn general_actions(&self) -> impl Iterator<Item = (&str, i64)> {
        self.general.iter().map(|(name, &id)| (name.as_str(), id))
    }

    /// actions-on-object, by name.
    pub fn object_actions(&self) -> impl Iterator<Item = (&str, i64)> {
        self.on_object.iter().map(|(name, &id)| (name.as_str(), id))
    }
}

/// builder for [`ActionRegistry`].
#[derive(Debug, Default)]
pub struct ActionRegistryBuilder {
    registry: ActionRegistry,
}

impl ActionRegistryBuilder {
    /// register a general action, replacing any general action of that name.
    pub fn general(mut self, name: impl Into<String>, id: i64) -> Self {
        self.registry.general.insert(name.into(), id);
        self
    }

    /// register an action-on-object, replacing any action-on-object of that
    /// name.
    pub fn on_object(mut self, name: impl Into<String>, id: i64) -> Self {
        self.registry.on_object.insert(name.into(), id);
        self
    }

    /// finish the registry.
    pub fn build(self) -> ActionRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_distinguishes_kinds() {
        let registry = ActionRegistry::builder()
            .general("create", 1)
            .on_object("edit", 2)
            .build();

        assert_eq!(registry.general("create"), Some(1));
        assert_eq!(registry.on_object("create"), None);
        assert_eq!(registry.on_object("edit"), Some(2));
        assert_eq!(registry.general("edit"), None);
        assert!(!registry.contains("delete"));
    }

    #[test]
    fn test_extend_inherits_and_overrides() {
        let parent = ActionRegistry::builder()
            .general("create", 1)
            .on_object("edit", 2)
            .build();
        let child = ActionRegistry::extend(&parent)
            .on_object("edit", 5)
            .general("archive", 6)
            .build();

        assert_eq!(child.general("create"), Some(1));
        assert_eq!(child.on_object("edit"), Some(5));
        assert_eq!(child.general("archive"), Some(6));

        // the parent is untouched
        assert_eq!(parent.on_object("edit"), Some(2));
        assert!(!parent.contains("archive"));
    }

    #[test]
    fn test_name_registered_as_both_kinds() {
        let registry = ActionRegistry::builder()
            .general("view", 1)
            .on_object("view", 1)
            .general("share", 3)
            .on_object("share", 4)
            .build();

        assert_eq!(registry.general("view"), Some(1));
        assert_eq!(registry.on_object("view"), Some(1));
        assert_eq!(registry.general("share"), Some(3));
        assert_eq!(registry.on_object("share"), Some(4));
        assert_eq!(registry.general_actions().count(), 2);
        assert_eq!(registry.object_actions().count(), 2);
    }

    #[test]
    fn test_reregistering_replaces_within_kind() {
        let registry = ActionRegistry::builder()
            .general("share", 3)
            .on_object("share", 4)
            .general("share", 7)
            .build();

        assert_eq!(registry.general("share"), Some(7));
        assert_eq!(registry.on_object("share"), Some(4));
    }
}
