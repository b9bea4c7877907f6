pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_titles;
mod m20250608_000001_create_subtypes;
mod m20250615_000001_create_title_metadata;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_titles::Migration),
            Box::new(m20250608_000001_create_subtypes::Migration),
            Box::new(m20250615_000001_create_title_metadata::Migration),
        ]
    }
}
