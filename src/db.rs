use rocket_db_pools::sqlx::{self, migrate::Migrator, PgPool};
use rocket_db_pools::Database;

#[derive(Database)]
#[database("campaign_db")]
pub struct CampaignDb(sqlx::PgPool);

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations.
///
/// Idempotent: migrations that have already been applied are skipped. Called
/// from an ignite fairing so the server never serves traffic against a stale
/// schema.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    log::info!("checking database migration state");
    MIGRATOR.run(pool).await?;
    log::info!("database migrations up to date");
    Ok(())
}
