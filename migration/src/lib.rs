pub use sea_orm_migration::prelude::*;

mod m20251012_094210_create_cache_entries_table;
mod m20251012_094805_create_user_preferences_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251012_094210_create_cache_entries_table::Migration),
            Box::new(m20251012_094805_create_user_preferences_table::Migration),
        ]
    }
}
