// Service exports
pub mod catalog;
pub mod deep_dive;
pub mod gemini;
pub mod postgres;
pub mod verification;

pub use catalog::CatalogBackend;
pub use deep_dive::{DeepDiveCache, DeepDiveError, DeepDiveSource};
pub use gemini::GeminiClient;
pub use postgres::{PostgresCatalog, PostgresError};
pub use verification::{DocumentStore, LocalDocumentStore, VerificationError, VerificationReceipt, VerificationService};
