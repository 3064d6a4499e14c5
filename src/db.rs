/*
 * Responsibility
 * - PgPool の構築 (上限・idle 下限・lifetime は Config から)
 * - development のときだけ起動時に migration を流す
 */
use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};

use crate::config::Config;

/// Connect eagerly so an unreachable database aborts startup.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_pool.max_connections)
        .min_connections(config.db_pool.min_connections)
        .max_lifetime(config.db_pool.max_lifetime)
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_pool.max_connections,
        min_connections = config.db_pool.min_connections,
        "PostgreSQL connection pool established"
    );

    Ok(pool)
}

pub async fn auto_migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
