use std::sync::Arc;

use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use time::Duration;

use crate::auth::session::SessionStore;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let sessions = SessionStore::new(Duration::minutes(config.session_ttl_minutes));

        Ok(Self {
            db,
            config,
            sessions,
        })
    }

    /// State backed by a fresh in-memory database with migrations applied.
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        // A single connection keeps every query on the same in-memory db.
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("migrations");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            session_ttl_minutes: 5,
        });

        Self {
            db,
            sessions: SessionStore::new(Duration::minutes(config.session_ttl_minutes)),
            config,
        }
    }
}
