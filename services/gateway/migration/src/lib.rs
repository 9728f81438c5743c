pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_tfa_enrollments;
mod m20260301_000002_create_challenge_tokens;
mod m20260301_000003_create_login_ips;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_tfa_enrollments::Migration),
            Box::new(m20260301_000002_create_challenge_tokens::Migration),
            Box::new(m20260301_000003_create_login_ips::Migration),
        ]
    }
}
