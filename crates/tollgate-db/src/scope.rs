//! queryable universes of candidate objects.
//!
//! a listing returns permitted object ids; a [`ModelScope`] turns those ids
//! back into the host application's own records.

use std::collections::HashSet;
use std::future::Future;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tollgate_types::Identifiable;

use crate::Result;

/// the universe of objects a policy lists from.
pub trait ModelScope: Send + Sync {
    /// the record type yielded.
    type Model: Send;

    /// every object in the universe.
    fn all(&self) -> impl Future<Output = Result<Vec<Self::Model>>> + Send;

    /// the objects whose id is a member of `ids`.
    fn with_ids(&self, ids: &[i64]) -> impl Future<Output = Result<Vec<Self::Model>>> + Send;
}

/// a scope over any sea-orm entity, filtered on its id column.
#[derive(Clone, Debug)]
pub struct EntityScope<E: EntityTrait> {
    conn: DatabaseConnection,
    id_column: E::Column,
}

impl<E: EntityTrait> EntityScope<E> {
    /// scope over every row of `E`, identified by `id_column`.
    pub fn new(conn: DatabaseConnection, id_column: E::Column) -> Self {
        Self { conn, id_column }
    }
}

impl<E> ModelScope for EntityScope<E>
where
    E: EntityTrait + Send + Sync,
    E::Column: Send + Sync,
    E::Model: Send + Sync,
{
    type Model = E::Model;

    async fn all(&self) -> Result<Vec<E::Model>> {
        let models = E::find()
            .order_by_asc(self.id_column)
            .all(&self.conn)
            .await?;
        Ok(models)
    }

    async fn with_ids(&self, ids: &[i64]) -> Result<Vec<E::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = E::find()
            .filter(self.id_column.is_in(ids.iter().copied()))
            .order_by_asc(self.id_column)
            .all(&self.conn)
            .await?;
        Ok(models)
    }
}

/// a fixed, in-memory universe.
#[derive(Clone, Debug, Default)]
pub struct StaticScope<T> {
    items: Vec<T>,
}

impl<T> StaticScope<T> {
    /// scope over `items`, in the given order.
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> ModelScope for StaticScope<T>
where
    T: Identifiable + Clone + Send + Sync,
{
    type Model = T;

    async fn all(&self) -> Result<Vec<T>> {
        Ok(self.items.clone())
    }

    async fn with_ids(&self, ids: &[i64]) -> Result<Vec<T>> {
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        Ok(self
            .items
            .iter()
            .filter(|item| wanted.contains(&item.id()))
            .cloned()
            .collect())
    }
}
