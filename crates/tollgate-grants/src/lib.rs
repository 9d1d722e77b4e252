//! action-grant authorization for tollgate.
//!
//! this crate answers "may this actor perform this action" over grants held
//! in a [`GrantStore`]:
//! - [`Query`]: can / list over one actor or an actor set, memoized per instance
//! - [`Grant`] / [`Revoke`] / [`BulkRevoke`]: idempotent writes
//! - [`Policy`] / [`Enforcer`]: named actions with override points
//!
//! grants are deny-by-default and combine with OR: holding any listed action
//! through any member of the actor set is enough.

#![warn(missing_docs)]

pub mod error;
pub mod permission;
pub mod policy;
pub mod query;
pub mod registry;

pub use error::{ArgumentError, Error, GrantError, Result, RevokeError};
pub use permission::{BulkRevoke, Grant, Revoke};
pub use policy::{Enforcer, Policy, Selection, Verdict};
pub use query::Query;
pub use registry::{ActionRegistry, ActionRegistryBuilder};

use tollgate_db::GrantStore;
use tollgate_types::{Actions, Principal};

/// one-off check on a fresh [`Query`], in the unscoped segment.
pub async fn can<S: GrantStore>(
    store: S,
    principal: impl Into<Principal>,
    actions: impl Into<Actions>,
    object_type: &str,
    object_id: Option<i64>,
) -> Result<bool> {
    Query::new(store, principal)
        .can(actions, object_type, object_id)
        .await
}

/// one-off listing on a fresh [`Query`], in the unscoped segment.
pub async fn list<S: GrantStore>(
    store: S,
    principal: impl Into<Principal>,
    action: impl Into<Actions>,
    object_type: &str,
) -> Result<Vec<i64>> {
    Query::new(store, principal).list(action, object_type).await
}

/// one-off grant to a single actor, in the unscoped segment.
pub async fn grant<S: GrantStore>(
    store: S,
    principal: impl Into<Principal>,
    action: i64,
    object_type: &str,
    object_id: Option<i64>,
) -> Result<()> {
    Grant::new(store, principal)?
        .grant(action, object_type, object_id)
        .await?;
    Ok(())
}

/// one-off revocation from a single actor, in the unscoped segment.
///
/// returns the number of grants removed.
pub async fn revoke<S: GrantStore>(
    store: S,
    principal: impl Into<Principal>,
    action: i64,
    object_type: &str,
    object_id: Option<i64>,
) -> Result<u64> {
    let removed = Revoke::new(store, principal)?
        .revoke(action, object_type, object_id)
        .await?;
    Ok(removed)
}
