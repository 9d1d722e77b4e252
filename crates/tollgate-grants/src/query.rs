//! the read path: can / list over an actor set.

use std::collections::HashMap;

use tollgate_db::{GrantFilter, GrantStore};
use tollgate_types::{Actions, ActorSet, Principal, SegmentId};

use crate::error::{ArgumentError, Result};

/// memo key. action lists are stored sorted and deduplicated, since holding
/// any of them answers the check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Lookup {
    General {
        actions: Vec<i64>,
        object_type: String,
    },
    OnObject {
        actions: Vec<i64>,
        object_type: String,
        object_id: i64,
    },
}

/// per-request permission query.
///
/// every answer is memoized on the instance, so repeated checks within one
/// request cost one store round trip. answers are not refreshed: a grant or
/// revocation made after the first lookup is only seen by a new instance.
pub struct Query<S> {
    store: S,
    actors: ActorSet,
    segment_id: SegmentId,
    answers: HashMap<Lookup, bool>,
    listings: HashMap<(i64, String), Vec<i64>>,
}

impl<S: GrantStore> Query<S> {
    /// create a query for one actor or a set of actors acting as one.
    pub fn new(store: S, principal: impl Into<Principal>) -> Self {
        Self {
            store,
            actors: principal.into().into_actor_set(),
            segment_id: SegmentId::UNSCOPED,
            answers: HashMap::new(),
            listings: HashMap::new(),
        }
    }

    /// look up grants in `segment_id` from now on.
    ///
    /// clears every memoized answer, since they belong to the old segment.
    pub fn on_segment(&mut self, segment_id: impl Into<SegmentId>) -> &mut Self {
        let segment_id = segment_id.into();
        if segment_id != self.segment_id {
            self.segment_id = segment_id;
            self.answers.clear();
            self.listings.clear();
        }
        self
    }

    /// the segment lookups run against.
    pub fn segment_id(&self) -> SegmentId {
        self.segment_id
    }

    /// the identities whose grants are combined.
    pub fn actors(&self) -> &ActorSet {
        &self.actors
    }

    /// whether any actor holds any of `actions` in `object_type`.
    ///
    /// with `object_id` this checks action-on-object grants for that one
    /// object; without it, general grants.
    pub async fn can(
        &mut self,
        actions: impl Into<Actions>,
        object_type: &str,
        object_id: Option<i64>,
    ) -> Result<bool> {
        let actions = actions.into();
        if self.actors.is_empty() || actions.is_empty() {
            return Ok(false);
        }

        let mut ids = actions.ids().to_vec();
        ids.sort_unstable();
        ids.dedup();

        let key = match object_id {
            Some(object_id) => Lookup::OnObject {
                actions: ids.clone(),
                object_type: object_type.to_string(),
                object_id,
            },
            None => Lookup::General {
                actions: ids.clone(),
                object_type: object_type.to_string(),
            },
        };
        if let Some(&answer) = self.answers.get(&key) {
            tracing::debug!(?key, answer, "permission memo hit");
            return Ok(answer);
        }

        let filter = GrantFilter::new()
            .segment(self.segment_id)
            .actors(self.actors.clone())
            .actions(ids)
            .object_type(object_type);
        let answer = match object_id {
            Some(object_id) => {
                self.store
                    .object_grant_exists(&filter.object_id(object_id))
                    .await?
            }
            None => self.store.general_grant_exists(&filter).await?,
        };

        tracing::debug!(?key, answer, segment = %self.segment_id, "permission looked up");
        self.answers.insert(key, answer);
        Ok(answer)
    }

    /// ids of the objects in `object_type` any actor holds `action` on.
    ///
    /// ascending and without duplicates. `action` must be a single id.
    pub async fn list(&mut self, action: impl Into<Actions>, object_type: &str) -> Result<Vec<i64>> {
        let actions = action.into();
        let action = match actions.single() {
            Ok(action) => action,
            Err(_) => return Err(ArgumentError::NotSingleAction(actions).into()),
        };
        if self.actors.is_empty() {
            return Ok(Vec::new());
        }

        let key = (action, object_type.to_string());
        if let Some(ids) = self.listings.get(&key) {
            tracing::debug!(action, object_type, "listing memo hit");
            return Ok(ids.clone());
        }

        let filter = GrantFilter::new()
            .segment(self.segment_id)
            .actors(self.actors.clone())
            .action(action)
            .object_type(object_type);
        let ids = self.store.list_object_ids(&filter).await?;

        tracing::debug!(action, object_type, count = ids.len(), "listing looked up");
        self.listings.insert(key, ids.clone());
        Ok(ids)
    }
}
