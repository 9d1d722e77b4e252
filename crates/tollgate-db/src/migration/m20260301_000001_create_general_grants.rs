//! create general_grants table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GeneralGrants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneralGrants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GeneralGrants::SegmentId)
                            .big_integer()
                            .not_null()
                            .default(-1),
                    )
                    .col(ColumnDef::new(GeneralGrants::Action).big_integer().not_null())
                    .col(ColumnDef::new(GeneralGrants::ActorType).string().not_null())
                    .col(ColumnDef::new(GeneralGrants::ActorId).big_integer().not_null())
                    .col(ColumnDef::new(GeneralGrants::ObjectType).string().not_null())
                    .to_owned(),
            )
            .await?;

        // one row per (segment, actor, namespace, action); duplicate grants
        // lose on this index
        manager
            .create_index(
                Index::create()
                    .name("idx_general_grants_unique")
                    .table(GeneralGrants::Table)
                    .col(GeneralGrants::SegmentId)
                    .col(GeneralGrants::ActorType)
                    .col(GeneralGrants::ActorId)
                    .col(GeneralGrants::ObjectType)
                    .col(GeneralGrants::Action)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneralGrants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GeneralGrants {
    Table,
    Id,
    SegmentId,
    Action,
    ActorType,
    ActorId,
    ObjectType,
}
