pub use sea_orm_migration::prelude::*;

mod m20251019_000001_expenses;

/// Store used when `DATABASE_URL` is not set: `expenses.db` in the working
/// directory, created on first connect.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./expenses.db?mode=rwc";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251019_000001_expenses::Migration)]
    }
}
