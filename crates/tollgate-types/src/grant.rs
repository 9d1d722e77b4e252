//! the two persisted grant record kinds.
//!
//! both are immutable once stored: a grant is only ever inserted or deleted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Actor, SegmentId};

/// permission to perform an action within a namespace, not tied to any object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralGrant {
    /// opaque unique id.
    pub id: Uuid,

    /// partition the grant lives in.
    pub segment_id: SegmentId,

    /// numeric action id.
    pub action: i64,

    /// identity holding the grant.
    pub actor: Actor,

    /// namespace the action belongs to.
    pub object_type: String,
}

impl GeneralGrant {
    /// create a new grant record with a fresh id.
    pub fn new(
        segment_id: SegmentId,
        action: i64,
        actor: Actor,
        object_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            segment_id,
            action,
            actor,
            object_type: object_type.into(),
        }
    }
}

/// permission to perform an action on one specific object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectGrant {
    /// opaque unique id.
    pub id: Uuid,

    /// partition the grant lives in.
    pub segment_id: SegmentId,

    /// numeric action id.
    pub action: i64,

    /// identity holding the grant.
    pub actor: Actor,

    /// namespace of the object.
    pub object_type: String,

    /// id of the object within its namespace.
    pub object_id: i64,
}

impl ObjectGrant {
    /// create a new grant record with a fresh id.
    pub fn new(
        segment_id: SegmentId,
        action: i64,
        actor: Actor,
        object_type: impl Into<String>,
        object_id: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            segment_id,
            action,
            actor,
            object_type: object_type.into(),
            object_id,
        }
    }
}
