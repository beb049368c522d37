use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{MatchError, Recommender};
use crate::models::{ErrorResponse, HealthResponse, Profile, RecommendationResponse, VerificationResponse, VerifyStudentQuery};
use crate::services::{CatalogBackend, DeepDiveCache, DeepDiveError, DeepDiveSource, GeminiClient, LocalDocumentStore, VerificationError, VerificationService};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogBackend>,
    pub recommender: Recommender,
    pub deep_dive: Arc<DeepDiveCache<GeminiClient>>,
    pub verification: Arc<VerificationService<LocalDocumentStore>>,
}

/// Configure all university routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/universities/recommendations", web::post().to(recommendations))
        .route("/universities/verify-student", web::post().to(verify_student))
        .route("/universities/{id}/deep-dive", web::get().to(deep_dive));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.catalog.is_healthy().await { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Ranked recommendations endpoint
///
/// POST /api/v1/universities/recommendations
///
/// Request body:
/// ```json
/// {
///   "budget": 500000,
///   "careerGoals": "I want to work in data science and AI",
///   "preferredCountries": ["Germany"]
/// }
/// ```
async fn recommendations(
    state: web::Data<AppState>,
    profile: web::Json<Profile>,
) -> impl Responder {
    match state.recommender.recommend(state.catalog.as_ref(), &profile).await {
        Ok(ranked) => {
            tracing::info!(
                "Returning {} recommendations from {} catalog",
                ranked.len(),
                state.catalog.kind()
            );
            HttpResponse::Ok().json(RecommendationResponse::from_ranking(&ranked))
        }
        Err(MatchError::InvalidProfile(message)) => {
            tracing::info!("Rejected profile: {}", message);
            error_response(actix_web::http::StatusCode::BAD_REQUEST, "InvalidProfile", message)
        }
        Err(e @ MatchError::CollaboratorUnavailable(_)) => {
            tracing::error!("Failed to rank universities: {}", e);
            error_response(
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                "CollaboratorUnavailable",
                e.to_string(),
            )
        }
    }
}

/// AI deep-dive report endpoint
///
/// GET /api/v1/universities/{id}/deep-dive
async fn deep_dive(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let candidate_id = path.into_inner();

    match state.deep_dive.fetch_report(&candidate_id).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e @ DeepDiveError::AIServiceUnavailable(_)) => {
            tracing::error!("Deep-dive for {} failed: {}", candidate_id, e);
            error_response(
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                "AIServiceUnavailable",
                e.to_string(),
            )
        }
    }
}

/// Mentor verification endpoint
///
/// POST /api/v1/universities/verify-student?studentId={id}&batch={start-end}
///
/// The request body is the identity document, stored as-is.
async fn verify_student(
    state: web::Data<AppState>,
    query: web::Query<VerifyStudentQuery>,
    document: web::Bytes,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "InvalidRequest",
            errors.to_string(),
        );
    }

    match state
        .verification
        .verify(&query.student_id, &query.batch, &document)
        .await
    {
        Ok(receipt) => HttpResponse::Ok().json(VerificationResponse {
            message: "Verification submitted".to_string(),
            token: Some(receipt.token.to_string()),
        }),
        Err(e @ (VerificationError::BatchExpired(_) | VerificationError::MissingDocument)) => {
            HttpResponse::BadRequest().json(VerificationResponse::rejected(e.to_string()))
        }
        Err(e @ VerificationError::CollaboratorUnavailable(_)) => {
            tracing::error!("Verification for {} failed: {}", query.student_id, e);
            HttpResponse::ServiceUnavailable().json(VerificationResponse::rejected(e.to_string()))
        }
    }
}
