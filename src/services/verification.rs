use crate::core::eligibility::{EligibilityGate, MentorApplicant};
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Rejection reasons of the mentor verification workflow
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("{0}")]
    BatchExpired(String),

    #[error("Identity document is empty")]
    MissingDocument,

    #[error("Document store unavailable: {0}")]
    CollaboratorUnavailable(String),
}

/// Storage for uploaded identity documents; contents are opaque
pub trait DocumentStore: Send + Sync {
    fn store(
        &self,
        token: &Uuid,
        student_id: &str,
        document: &[u8],
    ) -> impl Future<Output = Result<String, VerificationError>> + Send;
}

/// Writes each document to `<dir>/<token>.bin`
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    dir: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentStore for LocalDocumentStore {
    async fn store(
        &self,
        token: &Uuid,
        student_id: &str,
        document: &[u8],
    ) -> Result<String, VerificationError> {
        let unavailable = |e: std::io::Error| VerificationError::CollaboratorUnavailable(e.to_string());

        tokio::fs::create_dir_all(&self.dir).await.map_err(unavailable)?;
        let path = self.dir.join(format!("{}.bin", token));
        tokio::fs::write(&path, document).await.map_err(unavailable)?;

        tracing::debug!("Stored identity document for {} at {}", student_id, path.display());
        Ok(path.display().to_string())
    }
}

/// Successful verification
#[derive(Debug, Clone)]
pub struct VerificationReceipt {
    pub token: Uuid,
    pub student_id: String,
    pub document_ref: String,
}

/// Mentor verification: eligibility gate first, then document storage
pub struct VerificationService<S> {
    gate: EligibilityGate,
    store: S,
}

impl<S: DocumentStore> VerificationService<S> {
    pub fn new(gate: EligibilityGate, store: S) -> Self {
        Self { gate, store }
    }

    pub async fn verify(
        &self,
        student_id: &str,
        batch_range: &str,
        document: &[u8],
    ) -> Result<VerificationReceipt, VerificationError> {
        self.verify_at(student_id, batch_range, document, crate::core::eligibility::current_year())
            .await
    }

    pub async fn verify_at(
        &self,
        student_id: &str,
        batch_range: &str,
        document: &[u8],
        current_year: i32,
    ) -> Result<VerificationReceipt, VerificationError> {
        let applicant = MentorApplicant {
            student_id,
            batch_range,
        };

        let decision = self.gate.evaluate_at(&applicant, current_year);
        if !decision.eligible {
            return Err(VerificationError::BatchExpired(decision.reason));
        }

        if document.is_empty() {
            return Err(VerificationError::MissingDocument);
        }

        let token = Uuid::new_v4();
        let document_ref = self.store.store(&token, student_id, document).await?;

        tracing::info!(
            "Verified mentor {} (batch {}, document {} bytes)",
            student_id,
            batch_range,
            document.len()
        );

        Ok(VerificationReceipt {
            token,
            student_id: student_id.to_string(),
            document_ref,
        })
    }
}
