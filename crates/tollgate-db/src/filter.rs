//! grant filters shared by existence checks, deletes and listings.

use sea_orm::{ColumnTrait, Condition, EntityTrait};
use tollgate_types::{ActorFilter, ActorSet, SegmentId};

use crate::entity::{general_grant, object_grant};
use crate::{Error, Result, tuple};

/// conjunctive filter over grant rows. unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantFilter {
    /// restrict to one segment.
    pub segment_id: Option<SegmentId>,

    /// restrict to rows held by any of these actors.
    pub actors: Option<ActorSet>,

    /// restrict to any of these action ids.
    pub actions: Option<Vec<i64>>,

    /// restrict to one namespace.
    pub object_type: Option<String>,

    /// restrict to one object. only meaningful for object grants.
    pub object_id: Option<i64>,
}

impl GrantFilter {
    /// a filter matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// restrict to one segment.
    pub fn segment(mut self, segment_id: SegmentId) -> Self {
        self.segment_id = Some(segment_id);
        self
    }

    /// restrict to rows held by any member of `actors`.
    pub fn actors(mut self, actors: impl Into<ActorSet>) -> Self {
        self.actors = Some(actors.into());
        self
    }

    /// restrict to one action id.
    pub fn action(mut self, action: i64) -> Self {
        self.actions = Some(vec![action]);
        self
    }

    /// restrict to any of several action ids.
    pub fn actions(mut self, actions: impl IntoIterator<Item = i64>) -> Self {
        self.actions = Some(actions.into_iter().collect());
        self
    }

    /// restrict to one namespace.
    pub fn object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }

    /// restrict to one object id.
    pub fn object_id(mut self, object_id: i64) -> Self {
        self.object_id = Some(object_id);
        self
    }

    /// render this filter against a grant table.
    pub(crate) fn condition<E: GrantTable>(&self, strategy: ActorFilter) -> Result<Condition> {
        let mut cond = Condition::all();

        if let Some(segment_id) = self.segment_id {
            cond = cond.add(E::segment_id().eq(segment_id.0));
        }
        if let Some(actors) = &self.actors {
            cond = cond.add(tuple::actor_condition(
                strategy,
                E::actor_type(),
                E::actor_id(),
                actors,
            )?);
        }
        if let Some(actions) = &self.actions {
            cond = cond.add(E::action().is_in(actions.iter().copied()));
        }
        if let Some(object_type) = &self.object_type {
            cond = cond.add(E::object_type().eq(object_type.as_str()));
        }
        if let Some(object_id) = self.object_id {
            let column = E::object_id().ok_or_else(|| {
                Error::InvalidData("general grants are not tied to an object id".to_string())
            })?;
            cond = cond.add(column.eq(object_id));
        }

        Ok(cond)
    }
}

/// the columns every grant table shares.
pub(crate) trait GrantTable: EntityTrait {
    fn segment_id() -> Self::Column;
    fn action() -> Self::Column;
    fn actor_type() -> Self::Column;
    fn actor_id() -> Self::Column;
    fn object_type() -> Self::Column;
    fn object_id() -> Option<Self::Column>;
}

impl GrantTable for general_grant::Entity {
    fn segment_id() -> Self::Column {
        general_grant::Column::SegmentId
    }
    fn action() -> Self::Column {
        general_grant::Column::Action
    }
    fn actor_type() -> Self::Column {
        general_grant::Column::ActorType
    }
    fn actor_id() -> Self::Column {
        general_grant::Column::ActorId
    }
    fn object_type() -> Self::Column {
        general_grant::Column::ObjectType
    }
    fn object_id() -> Option<Self::Column> {
        None
    }
}

impl GrantTable for object_grant::Entity {
    fn segment_id() -> Self::Column {
        object_grant::Column::SegmentId
    }
    fn action() -> Self::Column {
        object_grant::Column::Action
    }
    fn actor_type() -> Self::Column {
        object_grant::Column::ActorType
    }
    fn actor_id() -> Self::Column {
        object_grant::Column::ActorId
    }
    fn object_type() -> Self::Column {
        object_grant::Column::ObjectType
    }
    fn object_id() -> Option<Self::Column> {
        Some(object_grant::Column::ObjectId)
    }
}
