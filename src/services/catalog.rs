use crate::core::catalog::{CatalogError, CatalogSource, InMemoryCatalog};
use crate::models::Candidate;
use crate::services::postgres::PostgresCatalog;

/// Catalog backend selected by configuration
pub enum CatalogBackend {
    Memory(InMemoryCatalog),
    Postgres(PostgresCatalog),
}

impl CatalogBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogBackend::Memory(_) => "memory",
            CatalogBackend::Postgres(_) => "postgres",
        }
    }

    /// Whether the backing store answers
    pub async fn is_healthy(&self) -> bool {
        match self {
            CatalogBackend::Memory(_) => true,
            CatalogBackend::Postgres(pg) => pg.health_check().await.unwrap_or(false),
        }
    }
}

impl CatalogSource for CatalogBackend {
    async fn fetch_all(&self) -> Result<Vec<Candidate>, CatalogError> {
        match self {
            CatalogBackend::Memory(catalog) => catalog.fetch_all().await,
            CatalogBackend::Postgres(catalog) => catalog.fetch_all().await,
        }
    }
}
