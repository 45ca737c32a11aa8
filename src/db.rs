use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connect the pool and bring the `users` schema up to date. Every
/// operation depends on that table, so a failed migration aborts startup.
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    MIGRATOR.run(&db).await.context("run migrations")?;
    tracing::info!(migrations = MIGRATOR.iter().count(), "schema up to date");

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_migration_is_embedded() {
        let descriptions: Vec<_> = MIGRATOR.iter().map(|m| m.description.to_string()).collect();
        assert_eq!(descriptions.len(), 1);
        assert!(descriptions[0].contains("users"));
    }
}
