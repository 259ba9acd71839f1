use sea_orm_migration::prelude::*;

mod m20260101_000001_create_users;
mod m20260101_000002_create_outpasses;
mod m20260101_000003_create_notifications;
mod m20260101_000004_add_pending_outpass_guard;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_outpasses::Migration),
            Box::new(m20260101_000003_create_notifications::Migration),
            Box::new(m20260101_000004_add_pending_outpass_guard::Migration),
        ]
    }
}
