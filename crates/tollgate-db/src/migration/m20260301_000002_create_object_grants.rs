//! create object_grants table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ObjectGrants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ObjectGrants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ObjectGrants::SegmentId)
                            .big_integer()
                            .not_null()
                            .default(-1),
                    )
                    .col(ColumnDef::new(ObjectGrants::Action).big_integer().not_null())
                    .col(ColumnDef::new(ObjectGrants::ActorType).string().not_null())
                    .col(ColumnDef::new(ObjectGrants::ActorId).big_integer().not_null())
                    .col(ColumnDef::new(ObjectGrants::ObjectType).string().not_null())
                    .col(ColumnDef::new(ObjectGrants::ObjectId).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_object_grants_unique")
                    .table(ObjectGrants::Table)
                    .col(ObjectGrants::SegmentId)
                    .col(ObjectGrants::ActorType)
                    .col(ObjectGrants::ActorId)
                    .col(ObjectGrants::ObjectType)
                    .col(ObjectGrants::ObjectId)
                    .col(ObjectGrants::Action)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // supports listing permitted object ids within a namespace
        manager
            .create_index(
                Index::create()
                    .name("idx_object_grants_object")
                    .table(ObjectGrants::Table)
                    .col(ObjectGrants::SegmentId)
                    .col(ObjectGrants::ObjectType)
                    .col(ObjectGrants::ObjectId)
                    .col(ObjectGrants::Action)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ObjectGrants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ObjectGrants {
    Table,
    Id,
    SegmentId,
    Action,
    ActorType,
    ActorId,
    ObjectType,
    ObjectId,
}
