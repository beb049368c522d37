use crate::models::Candidate;
use serde::Deserialize;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by catalog sources
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid catalog record: {0}")]
    InvalidRecord(String),

    #[error("Failed to read catalog seed: {0}")]
    SeedFile(#[from] std::io::Error),

    #[error("Invalid catalog seed format: {0}")]
    SeedFormat(#[from] toml::de::Error),
}

/// Read-all access to the candidate catalog
///
/// One call yields one consistent snapshot; callers fetch once per ranking
/// and never cache the result.
pub trait CatalogSource: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Candidate>, CatalogError>> + Send;
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Catalog held in memory, loaded from a TOML seed or built directly
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    snapshot: RwLock<Arc<Vec<Candidate>>>,
}

impl InMemoryCatalog {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(candidates)),
        }
    }

    /// Parse `[[candidates]]` tables
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let seed: SeedFile = toml::from_str(raw)?;

        if let Some(blank) = seed.candidates.iter().find(|c| c.id.trim().is_empty()) {
            return Err(CatalogError::InvalidRecord(format!(
                "candidate without identifier: {:?}",
                blank.name
            )));
        }

        Ok(Self::new(seed.candidates))
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml_str(&raw)?;
        tracing::debug!("Loaded catalog seed from {}", path.as_ref().display());
        Ok(catalog)
    }

    /// Swap in a refreshed catalog; snapshots already handed out are unaffected
    pub async fn replace(&self, candidates: Vec<Candidate>) {
        *self.snapshot.write().await = Arc::new(candidates);
    }

    pub async fn len(&self) -> usize {
        self.snapshot.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl CatalogSource for InMemoryCatalog {
    async fn fetch_all(&self) -> Result<Vec<Candidate>, CatalogError> {
        let snapshot = self.snapshot.read().await.clone();
        Ok(snapshot.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
[[candidates]]
id = "stanford"
name = "Stanford University"
avgCost = 55000.0
placementPct = 96.0
tags = ["Tech", "Entrepreneurship", "AI", "Research"]
country = "USA"
worldRanking = 3

[[candidates]]
id = "tum"
avgCost = 500.0
tags = ["Engineering", "Robotics"]
"#;

    #[tokio::test]
    async fn test_load_seed() {
        let catalog = InMemoryCatalog::from_toml_str(SEED).unwrap();
        let candidates = catalog.fetch_all().await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "stanford");
        assert_eq!(candidates[0].world_ranking, Some(3));
        assert_eq!(candidates[1].placement_pct, None);
    }

    #[test]
    fn test_rejects_blank_identifier() {
        let seed = "[[candidates]]\nid = \" \"\navgCost = 1.0\n";
        assert!(matches!(
            InMemoryCatalog::from_toml_str(seed),
            Err(CatalogError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            InMemoryCatalog::from_toml_str("[[candidates]\nid ="),
            Err(CatalogError::SeedFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_keeps_old_snapshot() {
        let catalog = InMemoryCatalog::from_toml_str(SEED).unwrap();
        let before = catalog.fetch_all().await.unwrap();

        catalog.replace(vec![]).await;

        assert_eq!(before.len(), 2);
        assert!(catalog.is_empty().await);
        assert!(catalog.fetch_all().await.unwrap().is_empty());
    }
}
