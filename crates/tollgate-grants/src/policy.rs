//! declarative policies over the engine.
//!
//! a [`Policy`] names its actions in an [`ActionRegistry`] and binds them to
//! one actor. an [`Enforcer`] runs checks, listings and writes for a policy.
//! a policy's `check` and `select` overrides run first; only a deferred
//! answer reaches the unrestricted shortcut and then the engine.

use tollgate_db::{GrantStore, ModelScope};
use tollgate_types::{ActorSet, Identifiable, Identity, SegmentId};

use crate::error::{ArgumentError, Result};
use crate::permission::{Grant, Revoke};
use crate::query::Query;
use crate::registry::ActionRegistry;

/// outcome of a custom check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verdict {
    /// permit without consulting grants.
    Allow,
    /// refuse without consulting grants.
    Deny,
    /// consult grants.
    #[default]
    Defer,
}

/// outcome of a custom listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// every object in the policy's scope.
    All,
    /// exactly these object ids, intersected with the scope.
    Only(Vec<i64>),
    /// list from grants.
    #[default]
    Defer,
}

/// a set of named actions on one namespace, bound to one actor.
pub trait Policy: Send + Sync {
    /// the identity the policy is constructed for.
    type Actor: Identity + Send + Sync;

    /// the objects actions-on-object apply to.
    type Object: Identifiable + Send + Sync;

    /// the universe listings draw from.
    type Scope: ModelScope<Model = Self::Object>;

    /// action names registered for this policy type.
    fn registry() -> &'static ActionRegistry;

    /// the actor this policy was constructed for.
    fn actor(&self) -> &Self::Actor;

    /// every object a listing may return.
    fn model_scope(&self) -> &Self::Scope;

    /// namespace grants are stored under. defaults to the type's own name.
    fn namespace() -> String {
        short_type_name::<Self>().to_string()
    }

    /// identities whose grants count for checks and listings.
    ///
    /// defaults to the constructed actor alone. override to add inherited
    /// identities such as groups or organisations.
    fn actors(&self) -> ActorSet {
        ActorSet::from(self.actor().actor())
    }

    /// segment grants are read from and written to.
    fn segment_id(&self) -> SegmentId {
        SegmentId::UNSCOPED
    }

    /// when true, every check the overrides defer passes, and every deferred
    /// listing is the whole scope.
    fn unrestricted(&self) -> bool {
        false
    }

    /// custom check, consulted before the unrestricted shortcut and grants.
    fn check(&self, _action: &str, _object: Option<&Self::Object>) -> Verdict {
        Verdict::Defer
    }

    /// custom listing, consulted before the unrestricted shortcut and grants.
    fn select(&self, _action: &str) -> Selection {
        Selection::Defer
    }
}

/// `crate::module::Name<T>` → `Name`
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// runs a policy's actions against a store.
///
/// checks on one enforcer share a single [`Query`], so they share its memo.
pub struct Enforcer<P, S> {
    policy: P,
    store: S,
    query: Option<Query<S>>,
}

impl<P, S> Enforcer<P, S>
where
    P: Policy,
    S: GrantStore + Clone,
{
    /// create an enforcer for `policy`.
    pub fn new(policy: P, store: S) -> Self {
        Self {
            policy,
            store,
            query: None,
        }
    }

    /// whether the actor may perform `action`, on `object` for an
    /// action-on-object.
    pub async fn can(&mut self, action: &str, object: Option<&P::Object>) -> Result<bool> {
        let id = self.resolve(action, object.is_some())?;

        match self.policy.check(action, object) {
            Verdict::Allow => return Ok(true),
            Verdict::Deny => return Ok(false),
            Verdict::Defer => {}
        }
        if self.policy.unrestricted() {
            return Ok(true);
        }

        let namespace = P::namespace();
        let object_id = object.map(Identifiable::id);
        self.query().can(id, &namespace, object_id).await
    }

    /// the objects in scope the actor may perform `action` on.
    pub async fn list(&mut self, action: &str) -> Result<Vec<P::Object>> {
        let registry = P::registry();
        let Some(id) = registry.on_object(action) else {
            if registry.contains(action) {
                return Err(ArgumentError::NotListable {
                    action: action.to_string(),
                    policy: policy_name::<P>(),
                }
                .into());
            }
            return Err(self.unknown(action).into());
        };

        let scope = self.policy.model_scope();
        let ids = match self.policy.select(action) {
            Selection::All => return Ok(scope.all().await?),
            Selection::Only(ids) => ids,
            Selection::Defer if self.policy.unrestricted() => return Ok(scope.all().await?),
            Selection::Defer => {
                let namespace = P::namespace();
                self.query().list(id, &namespace).await?
            }
        };

        Ok(self.policy.model_scope().with_ids(&ids).await?)
    }

    /// grant `action` to the constructed actor.
    ///
    /// inherited actors never receive grants through a policy.
    pub async fn grant(&self, action: &str, object: Option<&P::Object>) -> Result<()> {
        let id = self.resolve(action, object.is_some())?;
        let mut grant = Grant::new(self.store.clone(), self.policy.actor())?;
        grant
            .on_segment(self.policy.segment_id())
            .grant(id, &P::namespace(), object.map(Identifiable::id))
            .await?;
        Ok(())
    }

    /// revoke `action` from the constructed actor. returns the grants removed.
    pub async fn revoke(&self, action: &str, object: Option<&P::Object>) -> Result<u64> {
        let id = self.resolve(action, object.is_some())?;
        let mut revoke = Revoke::new(self.store.clone(), self.policy.actor())?;
        let removed = revoke
            .on_segment(self.policy.segment_id())
            .revoke(id, &P::namespace(), object.map(Identifiable::id))
            .await?;
        Ok(removed)
    }

    fn query(&mut self) -> &mut Query<S> {
        self.query.get_or_insert_with(|| {
            let mut query = Query::new(self.store.clone(), self.policy.actors());
            query.on_segment(self.policy.segment_id());
            query
        })
    }

    /// map a name to its id in the table matching the call shape.
    fn resolve(&self, action: &str, with_object: bool) -> std::result::Result<i64, ArgumentError> {
        let registry = P::registry();
        let found = if with_object {
            registry.on_object(action)
        } else {
            registry.general(action)
        };
        match found {
            Some(id) => Ok(id),
            None if !registry.contains(action) => Err(self.unknown(action)),
            // registered, but only as the other kind
            None if with_object => Err(ArgumentError::UnexpectedObject {
                action: action.to_string(),
                policy: policy_name::<P>(),
            }),
            None => Err(ArgumentError::MissingObject {
                action: action.to_string(),
                policy: policy_name::<P>(),
            }),
        }
    }

    fn unknown(&self, action: &str) -> ArgumentError {
        ArgumentError::UnknownAction {
            action: action.to_string(),
            policy: policy_name::<P>(),
        }
    }
}

fn policy_name<P: ?Sized>() -> String {
    short_type_name::<P>().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use tollgate_types::Actor;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Actor>(), "Actor");
        assert_eq!(short_type_name::<Vec<Actor>>(), "Vec");
        assert_eq!(short_type_name::<i64>(), "i64");
    }

    #[test]
    fn test_defaults_defer() {
        assert_eq!(Verdict::default(), Verdict::Defer);
        assert_eq!(Selection::default(), Selection::Defer);
    }
}
