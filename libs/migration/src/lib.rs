pub use sea_orm_migration::prelude::*;

mod m20250301_000000_create_category;
mod m20250301_000001_create_product;
mod m20250301_000002_create_product_category;
mod m20250301_000003_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000000_create_category::Migration),
            Box::new(m20250301_000001_create_product::Migration),
            Box::new(m20250301_000002_create_product_category::Migration),
            Box::new(m20250301_000003_seed_catalog::Migration),
        ]
    }
}
