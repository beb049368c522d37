use crate::core::catalog::{CatalogError, CatalogSource};
use crate::models::Candidate;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

impl From<PostgresError> for CatalogError {
    fn from(value: PostgresError) -> Self {
        CatalogError::Unavailable(value.to_string())
    }
}

/// University catalog stored in PostgreSQL
///
/// Every `fetch_all` runs one query, so a ranking always sees the table
/// as it was at that moment.
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Create a new catalog client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new catalog client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL catalog");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Load every university row
    pub async fn load_candidates(&self) -> Result<Vec<Candidate>, PostgresError> {
        let query = r#"
            SELECT id, name, avg_cost, tags, placement_pct, country, world_ranking
            FROM universities
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let candidates: Vec<Candidate> = rows.iter().filter_map(row_to_candidate).collect();

        tracing::debug!(
            "Loaded {} candidates from PostgreSQL ({} rows)",
            candidates.len(),
            rows.len()
        );

        Ok(candidates)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

impl CatalogSource for PostgresCatalog {
    async fn fetch_all(&self) -> Result<Vec<Candidate>, CatalogError> {
        Ok(self.load_candidates().await?)
    }
}

/// Map a row, dropping rows without a usable identifier
///
/// Bad scored columns are kept as `None` so the engine can degrade the
/// candidate instead of failing the whole catalog.
fn row_to_candidate(row: &PgRow) -> Option<Candidate> {
    let id: String = match row.try_get("id") {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Skipping university row without id: {}", e);
            return None;
        }
    };

    let world_ranking = row
        .try_get::<Option<i32>, _>("world_ranking")
        .ok()
        .flatten()
        .and_then(|rank| u32::try_from(rank).ok());

    Some(Candidate {
        name: row.try_get::<Option<String>, _>("name").ok().flatten(),
        avg_cost: row.try_get::<Option<f64>, _>("avg_cost").ok().flatten(),
        tags: row.try_get::<Vec<String>, _>("tags").unwrap_or_default(),
        placement_pct: row.try_get::<Option<f64>, _>("placement_pct").ok().flatten(),
        country: row.try_get::<Option<String>, _>("country").ok().flatten(),
        world_ranking,
        id,
    })
}
