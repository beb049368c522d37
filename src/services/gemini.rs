use crate::core::catalog::CatalogSource;
use crate::models::DeepDiveReport;
use crate::services::catalog::CatalogBackend;
use crate::services::deep_dive::{DeepDiveError, DeepDiveSource};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Gemini `generateContent` client producing university deep-dive reports
///
/// The model is asked for a JSON document matching [`DeepDiveReport`];
/// anything else (transport error, non-2xx status, missing or unparsable
/// text part) is reported as `AIServiceUnavailable`.
///
/// When a catalog is attached the prompt names the institution by its
/// display name; otherwise only the id is sent.
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
    catalog: Option<Arc<CatalogBackend>>,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, DeepDiveError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            client,
            catalog: None,
        })
    }

    /// Resolve display names from this catalog
    pub fn with_catalog(mut self, catalog: Arc<CatalogBackend>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Display name of the institution, if the catalog knows it
    ///
    /// A catalog failure only costs the name; the report is still requested.
    async fn resolve_name(&self, candidate_id: &str) -> Option<String> {
        let catalog = self.catalog.as_ref()?;

        match catalog.fetch_all().await {
            Ok(candidates) => candidates
                .into_iter()
                .find(|c| c.id == candidate_id)
                .and_then(|c| c.name)
                .filter(|name| !name.trim().is_empty()),
            Err(e) => {
                tracing::warn!("Could not resolve name for {}: {}", candidate_id, e);
                None
            }
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Prompt asking for the report of one institution
    pub fn build_prompt(candidate_id: &str, name: Option<&str>) -> String {
        let subject = match name {
            Some(name) => format!("{} (catalog id \"{}\")", name, candidate_id),
            None => format!("the university identified as \"{}\"", candidate_id),
        };

        format!(
            "Provide a highly detailed, professional analysis of {} based on its official website.\n\
             Return a JSON object with the following structure:\n\
             {{\n\
               \"officialWebsite\": \"URL of the university homepage\",\n\
               \"infrastructure\": \"Detailed description of campus facilities and tech\",\n\
               \"departments\": [\"List of major academic departments\"],\n\
               \"entranceExams\": [{{\"name\": \"Exam Name\", \"details\": \"Required score/info\", \"applicationLink\": \"Direct link if possible\"}}],\n\
               \"scholarships\": [{{\"title\": \"Scholarship Name\", \"eligibility\": \"Who can apply\", \"link\": \"Application URL\"}}],\n\
               \"languageRequirements\": [\"Language exams needed like IELTS, TOEFL, JLPT with required scores\"],\n\
               \"professorHighlights\": [\"Highlights of 2-3 notable faculty members and their research areas\"]\n\
             }}\n\
             Ensure all information is up-to-date.",
            subject
        )
    }

    /// Extract and parse the JSON report from a `generateContent` response
    pub fn parse_report(body: &Value) -> Result<DeepDiveReport, DeepDiveError> {
        let text = body
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .and_then(|p| p.first())
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                DeepDiveError::AIServiceUnavailable("Response contained no text part".into())
            })?;

        serde_json::from_str(text).map_err(|e| {
            DeepDiveError::AIServiceUnavailable(format!("Failed to parse report: {}", e))
        })
    }
}

impl DeepDiveSource for GeminiClient {
    async fn fetch_report(&self, candidate_id: &str) -> Result<DeepDiveReport, DeepDiveError> {
        let name = self.resolve_name(candidate_id).await;
        let payload = json!({
            "contents": [{
                "parts": [{ "text": Self::build_prompt(candidate_id, name.as_deref()) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json"
            }
        });

        tracing::debug!("Requesting deep-dive report for {}", candidate_id);

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!(
                "Deep-dive request for {} failed: {} - {}",
                candidate_id,
                status,
                body
            );
            return Err(DeepDiveError::AIServiceUnavailable(format!(
                "AI service returned {}",
                status
            )));
        }

        let json: Value = response.json().await?;
        Self::parse_report(&json)
    }
}
