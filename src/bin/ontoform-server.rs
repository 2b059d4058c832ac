//! ontoform JSON API server.
//!
//! Exposes one knowledge base over HTTP:
//!
//! - `GET  /health`: server status and ontology load outcome
//! - `GET  /classes`: declared classes
//! - `GET  /properties?class=<iri>`: properties applicable to a class
//! - `GET  /instances[?class=<iri>]`: existing instances
//! - `POST /entities`: add an entity (JSON `EntitySubmission`)
//! - `GET  /export[?format=ntriples|turtle|rdfxml|json]`: dump the graph
//!
//! Build and run: `cargo run --features server --bin ontoform-server`

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use ontoform::catalog::InstanceEntry;
use ontoform::config::{KbConfig, OntoPaths};
use ontoform::error::OntoError;
use ontoform::export::ExportFormat;
use ontoform::kb::{KnowledgeBase, OntologyStatus};
use ontoform::mutation::{Confirmation, EntitySubmission};
use ontoform::schema::{ClassEntry, Listing, PropertyEntry};

type AppState = Arc<KnowledgeBase>;
type ApiError = (StatusCode, String);

// ── Request / response types ──────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    ontology: OntologyStatus,
}

#[derive(Deserialize)]
struct ClassParam {
    class: Option<String>,
}

#[derive(Deserialize)]
struct ExportParam {
    format: Option<String>,
}

// ── Helpers ───────────────────────────────────────────────────────────────

/// Run a store operation off the async runtime.
async fn blocking<T, F>(kb: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&KnowledgeBase) -> T + Send + 'static,
{
    let kb = Arc::clone(kb);
    tokio::task::spawn_blocking(move || f(&kb))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("worker task failed: {e}"),
            )
        })
}

fn error_response(e: OntoError) -> ApiError {
    let status = match &e {
        OntoError::Validation(_) | OntoError::Query(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health(State(kb): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let ontology = blocking(&kb, |kb| kb.ensure_ontology().clone()).await?;
    Ok(Json(HealthResponse {
        status: if ontology.is_loaded() { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ontology,
    }))
}

async fn classes(State(kb): State<AppState>) -> Result<Json<Listing<ClassEntry>>, ApiError> {
    Ok(Json(blocking(&kb, |kb| kb.list_classes()).await?))
}

async fn properties(
    State(kb): State<AppState>,
    Query(param): Query<ClassParam>,
) -> Result<Json<Listing<PropertyEntry>>, ApiError> {
    let class = param
        .class
        .ok_or((StatusCode::BAD_REQUEST, "missing `class` parameter".to_string()))?;
    Ok(Json(blocking(&kb, move |kb| kb.list_properties(&class)).await?))
}

async fn instances(
    State(kb): State<AppState>,
    Query(param): Query<ClassParam>,
) -> Result<Json<Listing<InstanceEntry>>, ApiError> {
    let class = param.class.filter(|c| !c.trim().is_empty());
    Ok(Json(
        blocking(&kb, move |kb| kb.list_instances(class.as_deref())).await?,
    ))
}

async fn add_entity(
    State(kb): State<AppState>,
    Json(submission): Json<EntitySubmission>,
) -> Result<(StatusCode, Json<Confirmation>), ApiError> {
    let confirmation = blocking(&kb, move |kb| kb.submit(&submission))
        .await?
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

async fn export(
    State(kb): State<AppState>,
    Query(param): Query<ExportParam>,
) -> Result<impl IntoResponse, ApiError> {
    let format: ExportFormat = match param.format {
        Some(name) => name.parse().map_err(|e| (StatusCode::BAD_REQUEST, e))?,
        None => ExportFormat::default(),
    };
    let bytes = blocking(&kb, move |kb| kb.export(format))
        .await?
        .map_err(error_response)?;
    Ok(([(header::CONTENT_TYPE, format.media_type())], bytes))
}

// ── Main ──────────────────────────────────────────────────────────────────

fn load_config() -> KbConfig {
    let mut config = match OntoPaths::resolve() {
        Ok(paths) => KbConfig::load_or_default(&paths.config_file()).unwrap_or_else(|e| {
            tracing::error!("failed to load config: {e}");
            std::process::exit(1);
        }),
        Err(e) => {
            tracing::warn!("{e}; using default config");
            KbConfig::default()
        }
    };
    config.apply_env();
    config
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config();
    let addr = config.listen.clone();

    let kb = match KnowledgeBase::open(config) {
        Ok(kb) => Arc::new(kb),
        Err(e) => {
            tracing::error!("failed to open knowledge base: {e}");
            std::process::exit(1);
        }
    };

    // Load the ontology before accepting requests; a failure is reported by /health.
    let status = match blocking(&kb, |kb| kb.ensure_ontology().clone()).await {
        Ok(status) => status,
        Err((_, message)) => {
            tracing::error!("{message}");
            std::process::exit(1);
        }
    };
    tracing::info!(ontology = %status, "ontoform server initialized");

    let app = Router::new()
        .route("/health", get(health))
        .route("/classes", get(classes))
        .route("/properties", get(properties))
        .route("/instances", get(instances))
        .route("/entities", post(add_entity))
        .route("/export", get(export))
        .layer(CorsLayer::permissive())
        .with_state(kb);

    tracing::info!("ontoform server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
