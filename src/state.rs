use std::sync::Arc;

use sqlx::SqlitePool;

use crate::catalog::youtube::{CatalogClient, YoutubeCatalog};
use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn CatalogClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        let catalog = Arc::new(YoutubeCatalog::new(&config.youtube)) as Arc<dyn CatalogClient>;

        Ok(Self {
            db,
            config,
            catalog,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        catalog: Arc<dyn CatalogClient>,
    ) -> Self {
        Self {
            db,
            config,
            catalog,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory state for tests: migrated SQLite pool plus a catalog fake
    /// that finds nothing, for handlers that never reach the catalog.
    pub(crate) async fn fake() -> Self {
        use std::str::FromStr;

        use axum::async_trait;
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

        use crate::catalog::dto::{VideoDetail, VideoSummary};
        use crate::catalog::youtube::CatalogError;
        use crate::config::YoutubeConfig;

        struct EmptyCatalog;

        #[async_trait]
        impl CatalogClient for EmptyCatalog {
            async fn search(&self, _query: &str) -> Result<Vec<VideoSummary>, CatalogError> {
                Ok(Vec::new())
            }

            async fn get_details(&self, _video_id: &str) -> Result<VideoDetail, CatalogError> {
                Err(CatalogError::NotFound)
            }
        }

        // One connection: each :memory: connection is its own database.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("parse sqlite url")
            .foreign_keys(true);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("in-memory pool");
        db::MIGRATOR.run(&db).await.expect("run migrations");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            youtube: YoutubeConfig {
                api_key: "test".into(),
                base_url: "http://localhost".into(),
                max_results: 20,
            },
        });

        Self::from_parts(db, config, Arc::new(EmptyCatalog))
    }
}
