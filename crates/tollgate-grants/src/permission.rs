//! the write path: grant, revoke and bulk revoke.
//!
//! writes are idempotent. granting something already granted succeeds
//! without adding a row, and revoking something never granted succeeds
//! without removing one. concurrent duplicate grants are settled by the
//! store's unique indexes.

use tollgate_db::{GrantFilter, GrantStore};
use tollgate_types::{Actor, GeneralGrant, ObjectGrant, Principal, SegmentId};

use crate::error::{GrantError, RevokeError};

fn single_actor(principal: impl Into<Principal>) -> Result<Actor, String> {
    match principal.into() {
        Principal::Single(actor) => Ok(actor),
        other => Err(other.to_string()),
    }
}

/// grants actions to one actor.
pub struct Grant<S> {
    store: S,
    actor: Actor,
    segment_id: SegmentId,
}

impl<S: GrantStore> Grant<S> {
    /// create a grant writer for one actor.
    ///
    /// an actor set is rejected: grants always belong to one identity.
    pub fn new(store: S, principal: impl Into<Principal>) -> Result<Self, GrantError> {
        let actor = single_actor(principal).map_err(GrantError::NotSingleActor)?;
        Ok(Self {
            store,
            actor,
            segment_id: SegmentId::UNSCOPED,
        })
    }

    /// write grants into `segment_id` from now on.
    pub fn on_segment(&mut self, segment_id: impl Into<SegmentId>) -> &mut Self {
        self.segment_id = segment_id.into();
        self
    }

    /// grant `action` in `object_type`, on one object when `object_id` is set.
    pub async fn grant(
        &self,
        action: i64,
        object_type: &str,
        object_id: Option<i64>,
    ) -> Result<(), GrantError> {
        let result = match object_id {
            Some(object_id) => {
                let grant = ObjectGrant::new(
                    self.segment_id,
                    action,
                    self.actor.clone(),
                    object_type,
                    object_id,
                );
                self.store.insert_object_grant(&grant).await
            }
            None => {
                let grant =
                    GeneralGrant::new(self.segment_id, action, self.actor.clone(), object_type);
                self.store.insert_general_grant(&grant).await
            }
        };

        match result {
            Ok(()) => {
                tracing::debug!(actor = %self.actor, action, object_type, ?object_id, "granted");
                Ok(())
            }
            Err(tollgate_db::Error::AlreadyExists(_)) => {
                tracing::debug!(
                    actor = %self.actor,
                    action,
                    object_type,
                    ?object_id,
                    "grant already present"
                );
                Ok(())
            }
            Err(source) => Err(GrantError::Store {
                action,
                object_type: object_type.to_string(),
                object_id,
                actor: self.actor.clone(),
                source,
            }),
        }
    }
}

/// revokes actions from one actor.
pub struct Revoke<S> {
    store: S,
    actor: Actor,
    segment_id: SegmentId,
}

impl<S: GrantStore> Revoke<S> {
    /// create a revoker for one actor.
    pub fn new(store: S, principal: impl Into<Principal>) -> Result<Self, RevokeError> {
        let actor = single_actor(principal).map_err(RevokeError::NotSingleActor)?;
        Ok(Self {
            store,
            actor,
            segment_id: SegmentId::UNSCOPED,
        })
    }

    /// revoke grants in `segment_id` from now on.
    pub fn on_segment(&mut self, segment_id: impl Into<SegmentId>) -> &mut Self {
        self.segment_id = segment_id.into();
        self
    }

    /// revoke `action` in `object_type`, on one object when `object_id` is set.
    ///
    /// returns the number of grants removed, which is zero when nothing was
    /// granted.
    pub async fn revoke(
        &self,
        action: i64,
        object_type: &str,
        object_id: Option<i64>,
    ) -> Result<u64, RevokeError> {
        let filter = GrantFilter::new()
            .segment(self.segment_id)
            .actors(self.actor.clone())
            .action(action)
            .object_type(object_type);
        let result = match object_id {
            Some(object_id) => {
                self.store
                    .delete_object_grants(&filter.object_id(object_id))
                    .await
            }
            None => self.store.delete_general_grants(&filter).await,
        };

        match result {
            Ok(removed) => {
                tracing::info!(actor = %self.actor, action, object_type, ?object_id, removed, "revoked");
                Ok(removed)
            }
            Err(source) => Err(RevokeError::Store {
                action,
                object_type: object_type.to_string(),
                object_id,
                actor: self.actor.clone(),
                source,
            }),
        }
    }
}

/// removes a general action from every actor in a namespace.
pub struct BulkRevoke<S> {
    store: S,
    segment_id: Option<SegmentId>,
}

impl<S: GrantStore> BulkRevoke<S> {
    /// create a bulk revoker covering every segment.
    pub fn new(store: S) -> Self {
        Self {
            store,
            segment_id: None,
        }
    }

    /// only revoke grants in `segment_id`.
    pub fn on_segment(&mut self, segment_id: impl Into<SegmentId>) -> &mut Self {
        self.segment_id = Some(segment_id.into());
        self
    }

    /// revoke general `action` in `object_type` from all actors.
    ///
    /// returns the number of grants removed.
    pub async fn revoke(&self, action: i64, object_type: &str) -> Result<u64, RevokeError> {
        let mut filter = GrantFilter::new().action(action).object_type(object_type);
        if let Some(segment_id) = self.segment_id {
            filter = filter.segment(segment_id);
        }

        let removed = self
            .store
            .delete_general_grants(&filter)
            .await
            .map_err(|source| RevokeError::Bulk {
                action,
                object_type: object_type.to_string(),
                source,
            })?;

        tracing::info!(action, object_type, segment = ?self.segment_id, removed, "bulk revoked");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tollgate_db::TollgateDb;
    use tollgate_types::ActorSet;

    async fn setup_test_db() -> TollgateDb {
        TollgateDb::new_in_memory().await.unwrap()
    }

    fn user(id: i64) -> Actor {
        Actor::new("User", id)
    }

    #[tokio::test]
    async fn test_grant_is_idempotent() {
        let db = setup_test_db().await;
        let grant = Grant::new(&db, user(7)).unwrap();
        grant.grant(1, "Post", None).await.unwrap();
        grant.grant(1, "Post", None).await.unwrap();
        grant.grant(2, "Post", Some(3)).await.unwrap();
        grant.grant(2, "Post", Some(3)).await.unwrap();

        assert_eq!(db.count_general_grants(&GrantFilter::new()).await.unwrap(), 1);
        assert_eq!(db.count_object_grants(&GrantFilter::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_grant_needs_single_actor() {
        let db = setup_test_db().await;
        let set = ActorSet::new().with("User", 7).with("Group", 1);
        assert!(matches!(
            Grant::new(&db, set.clone()),
            Err(GrantError::NotSingleActor(_))
        ));
        assert!(matches!(
            Revoke::new(&db, set),
            Err(RevokeError::NotSingleActor(_))
        ));
    }

    #[tokio::test]
    async fn test_revoke_missing_grant_is_ok() {
        let db = setup_test_db().await;
        let revoke = Revoke::new(&db, user(7)).unwrap();
        assert_eq!(revoke.revoke(1, "Post", None).await.unwrap(), 0);
        assert_eq!(revoke.revoke(1, "Post", Some(3)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revoke_only_touches_its_object() {
        let db = setup_test_db().await;
        let grant = Grant::new(&db, user(7)).unwrap();
        grant.grant(1, "Post", Some(3)).await.unwrap();
        grant.grant(1, "Post", Some(4)).await.unwrap();

        let revoke = Revoke::new(&db, user(7)).unwrap();
        assert_eq!(revoke.revoke(1, "Post", Some(3)).await.unwrap(), 1);

        let remaining = db
            .list_object_ids(&GrantFilter::new().actors(user(7)))
            .await
            .unwrap();
        assert_eq!(remaining, vec![4]);
    }

    #[tokio::test]
    async fn test_segments_are_separate() {
        let db = setup_test_db().await;
        let mut grant = Grant::new(&db, user(7)).unwrap();
        grant.on_segment(2).grant(1, "Post", None).await.unwrap();

        // unscoped revoke leaves the segment 2 grant alone
        let mut revoke = Revoke::new(&db, user(7)).unwrap();
        assert_eq!(revoke.revoke(1, "Post", None).await.unwrap(), 0);
        assert_eq!(revoke.on_segment(2).revoke(1, "Post", None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bulk_revoke() {
        let db = setup_test_db().await;
        for id in [1, 2, 3] {
            Grant::new(&db, user(id))
                .unwrap()
                .grant(1, "Post", None)
                .await
                .unwrap();
        }
        let mut scoped = Grant::new(&db, user(1)).unwrap();
        scoped.on_segment(4).grant(1, "Post", None).await.unwrap();
        Grant::new(&db, user(1))
            .unwrap()
            .grant(2, "Post", None)
            .await
            .unwrap();

        let mut bulk = BulkRevoke::new(&db);
        assert_eq!(bulk.on_segment(4).revoke(1, "Post").await.unwrap(), 1);
        assert_eq!(BulkRevoke::new(&db).revoke(1, "Post").await.unwrap(), 3);

        // action 2 survives
        assert_eq!(db.count_general_grants(&GrantFilter::new()).await.unwrap(), 1);
    }
}
