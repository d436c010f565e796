use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per (external id, payload kind): movie and show ids overlap,
        // and a show's details and its watch providers share the same id.
        manager
            .create_table(
                Table::create()
                    .table(CacheEntries::Table)
                    .if_not_exists()
                    .col(string(CacheEntries::CacheKey))
                    .col(string(CacheEntries::Kind))
                    .col(json(CacheEntries::Data))
                    .col(timestamp_with_time_zone(CacheEntries::StoredAt))
                    .primary_key(
                        Index::create()
                            .name("pk_cache_entries")
                            .col(CacheEntries::CacheKey)
                            .col(CacheEntries::Kind),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CacheEntries::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CacheEntries {
    Table,
    CacheKey,
    Kind,
    Data,
    StoredAt,
}
