pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_tariffs_and_subscriptions;
mod m20250608_000001_create_products_and_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_tariffs_and_subscriptions::Migration),
            Box::new(m20250608_000001_create_products_and_orders::Migration),
        ]
    }
}
