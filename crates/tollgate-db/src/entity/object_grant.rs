//! object grant entity: an action granted on one object instance.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tollgate_types::ObjectGrant;

/// object grant database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "object_grants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub segment_id: i64,
    pub action: i64,
    pub actor_type: String,
    pub actor_id: i64,
    pub object_type: String,
    pub object_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ObjectGrant> for ActiveModel {
    fn from(grant: &ObjectGrant) -> Self {
        ActiveModel {
            id: Set(grant.id),
            segment_id: Set(grant.segment_id.0),
            action: Set(grant.action),
            actor_type: Set(grant.actor.actor_type.clone()),
            actor_id: Set(grant.actor.id),
            object_type: Set(grant.object_type.clone()),
            object_id: Set(grant.object_id),
        }
    }
}
