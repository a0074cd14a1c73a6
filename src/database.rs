use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

pub mod assignment;
pub mod preferences;

pub async fn init_database(config: &DatabaseConfig) -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await?;

    let mut transaction = pool.begin().await?;

    // Create a schema for the portal
    sqlx::query(r#"CREATE SCHEMA IF NOT EXISTS cognic"#)
        .execute(&mut *transaction)
        .await
        .map_err(|e| Error::Config(format!("Could not create schema 'cognic': {e}")))?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS cognic.assignments(
            id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            title TEXT NOT NULL,
            subject TEXT NOT NULL,
            learning_outcomes TEXT NOT NULL,
            marking_criteria TEXT NOT NULL,
            additional_prompt TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );"#,
    )
    .execute(&mut *transaction)
    .await
    .map_err(|e| Error::Config(format!("Could not create table assignments: {e}")))?;

    // Key/value user preferences, e.g. the list or grid view mode
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS cognic.preferences(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );"#,
    )
    .execute(&mut *transaction)
    .await
    .map_err(|e| Error::Config(format!("Could not create table preferences: {e}")))?;

    transaction.commit().await?;
    info!("Database schema ready on {}", config.host);

    Ok(pool)
}
