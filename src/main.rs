use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use unisphere_match::config::{CatalogKind, Settings};
use unisphere_match::core::{EligibilityGate, InMemoryCatalog, MatchEngine, Recommender};
use unisphere_match::models::ScoringWeights;
use unisphere_match::routes::{self, universities::AppState};
use unisphere_match::services::{
    CatalogBackend, DeepDiveCache, GeminiClient, LocalDocumentStore, PostgresCatalog,
    VerificationService,
};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

async fn build_catalog(settings: &Settings) -> std::io::Result<CatalogBackend> {
    let catalog = &settings.catalog;

    match catalog.source {
        CatalogKind::Memory => {
            let memory = InMemoryCatalog::from_toml_file(&catalog.seed_path)
                .map_err(|e| startup_error("Failed to load catalog seed", e))?;
            info!("In-memory catalog loaded with {} universities", memory.len().await);
            Ok(CatalogBackend::Memory(memory))
        }
        CatalogKind::Postgres => {
            let url = catalog
                .database_url
                .as_deref()
                .ok_or_else(|| startup_error("Catalog configuration error", "catalog.database_url is required for postgres"))?;

            let postgres = PostgresCatalog::from_settings(
                url,
                catalog.max_connections,
                catalog.min_connections,
                catalog.acquire_timeout_secs,
                catalog.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!(
                "PostgreSQL catalog initialized (max: {} connections)",
                catalog.max_connections.unwrap_or(10)
            );
            Ok(CatalogBackend::Postgres(postgres))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging("info", "json");
            return Err(startup_error("Failed to load configuration", e));
        }
    };

    // LOG_FORMAT overrides the configured format
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    init_logging(&settings.logging.level, &log_format);

    info!("Starting UniSphere matching service...");

    let catalog = Arc::new(build_catalog(&settings).await?);

    // Initialize engine with configured weights
    let weights = ScoringWeights::from(&settings.scoring.weights);
    let engine = MatchEngine::from_weights(&weights, settings.scoring.extended_factors)
        .with_parallel_threshold(settings.scoring.parallel_threshold);

    info!(
        "Match engine initialized with factors {:?} (max score {})",
        engine.factor_names(),
        engine.max_score()
    );

    let recommender = Recommender::new(engine);

    // Initialize AI deep-dive client
    let deep_dive_settings = &settings.deep_dive;
    if deep_dive_settings.api_key.is_empty() {
        warn!("deep_dive.api_key is empty, deep-dive requests will fail");
    }

    let gemini = GeminiClient::new(
        deep_dive_settings.endpoint.clone(),
        deep_dive_settings.api_key.clone(),
        deep_dive_settings.model.clone(),
        Duration::from_secs(deep_dive_settings.timeout_secs.unwrap_or(60)),
    )
    .map_err(|e| startup_error("Failed to create AI client", e))?
    .with_catalog(catalog.clone());

    let cache_ttl = deep_dive_settings.cache_ttl_secs.unwrap_or(3600);
    let cache_size = deep_dive_settings.cache_size.unwrap_or(500);
    let deep_dive = Arc::new(DeepDiveCache::new(gemini, cache_size, cache_ttl));

    info!("Deep-dive client initialized (cache: {} entries, TTL: {}s)", cache_size, cache_ttl);

    let verification = Arc::new(VerificationService::new(
        EligibilityGate::mentor(),
        LocalDocumentStore::new(&settings.verification.upload_dir),
    ));

    // Build application state
    let app_state = AppState {
        catalog,
        recommender,
        deep_dive,
        verification,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let max_document_bytes = settings.verification.max_document_bytes;

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure_extractors(max_document_bytes))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
