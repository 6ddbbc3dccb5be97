//! HTTP server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/query` | Answer `{"query": "..."}` with `{"text": "..."}` |
//! | `POST` | `/api/upload_document` | Multipart PDF upload; replaces the stored document |
//! | `GET`  | `/api/document` | Metadata about the stored document |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! `/api/gemini` and `/api/upload_program` are accepted as aliases of the
//! query and upload routes for existing front-ends.
//!
//! # Error Contract
//!
//! Every failure responds with `{"error": "<message>"}`; see
//! [`RelayError`] for the status codes.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser front-end
//! served from another port can call the relay directly.

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{ApiKey, Config};
use crate::error::{RelayError, MISSING_API_KEY};
use crate::extract::{is_pdf_filename, ExtractError, PdfSupport, ONLY_PDF};
use crate::prompt::{prompt_for, validate_query};
use crate::store::{DocumentStatus, DocumentStore};
use crate::text_util::char_len;
use crate::upstream::{CompletionBackend, GeminiClient};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<DocumentStore>,
    /// `None` when no API key is configured; queries then fail per request.
    backend: Option<Arc<dyn CompletionBackend>>,
    pdf: PdfSupport,
}

impl AppState {
    pub fn new(config: Config, backend: Option<Arc<dyn CompletionBackend>>) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(DocumentStore::new()),
            backend,
            pdf: PdfSupport::detect(),
        }
    }

    /// Replaces the PDF capability detected at construction.
    pub fn with_pdf_support(mut self, pdf: PdfSupport) -> Self {
        self.pdf = pdf;
        self
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }
}

/// Builds the Gemini backend from the environment key, if one is set.
pub fn backend_from_env(config: &Config) -> anyhow::Result<Option<Arc<dyn CompletionBackend>>> {
    let Some(key) = ApiKey::from_env() else {
        tracing::warn!("no Gemini API key set; /api/query will report a configuration error");
        return Ok(None);
    };
    let client = GeminiClient::new(&config.upstream, key)?;
    Ok(Some(Arc::new(client)))
}

/// Starts the HTTP server with the Gemini backend.
///
/// A missing API key does not prevent startup.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let backend = backend_from_env(config)?;
    run_server_with_backend(config, backend).await
}

/// Starts the HTTP server with a caller-supplied completion backend.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server_with_backend(
    config: &Config,
    backend: Option<Arc<dyn CompletionBackend>>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState::new(config.clone(), backend);

    if !state.pdf.is_available() {
        tracing::warn!("PDF support not compiled in; uploads will be refused");
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("relay listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the router over `state`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.upload.max_bytes;

    Router::new()
        .route("/api/query", post(handle_query))
        .route("/api/gemini", post(handle_query))
        .route("/api/upload_document", post(handle_upload))
        .route("/api/upload_program", post(handle_upload))
        .route("/api/document", get(handle_document))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/query ============

#[derive(Deserialize)]
struct QueryRequest {
    #[serde(default)]
    query: Option<String>,
}

#[derive(Serialize)]
struct QueryResponse {
    text: String,
}

/// Handler for `POST /api/query`.
///
/// Validation happens before anything else, so a blank query never reaches
/// the backend.
async fn handle_query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, RelayError> {
    let Json(request) = body.map_err(|e| RelayError::Validation(e.body_text()))?;
    let query = validate_query(request.query.as_deref().unwrap_or_default())?;

    let backend = state
        .backend
        .as_ref()
        .ok_or_else(|| RelayError::Configuration(MISSING_API_KEY.to_string()))?;

    let document = state.store.get();
    let prompt = prompt_for(query, &document, &state.config.retrieval);
    tracing::debug!(
        backend = backend.name(),
        prompt_chars = char_len(&prompt),
        has_document = !document.is_empty(),
        "forwarding query"
    );

    let text = backend.complete(&prompt).await?;
    Ok(Json(QueryResponse { text }))
}

// ============ POST /api/upload_document ============

#[derive(Serialize)]
struct UploadResponse {
    ok: bool,
    message: String,
}

/// Handler for `POST /api/upload_document`.
///
/// Takes the first multipart field that carries a filename. The store is
/// only touched once extraction has succeeded.
async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, RelayError> {
    if !state.pdf.is_available() {
        return Err(ExtractError::Unavailable.into());
    }
    let mut multipart = multipart.map_err(|e| RelayError::Validation(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Validation(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if !is_pdf_filename(&filename) {
            return Err(RelayError::Validation(ONLY_PDF.to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RelayError::Validation(e.to_string()))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| RelayError::Validation("Missing file upload".to_string()))?;

    let pdf = state.pdf;
    let text = tokio::task::spawn_blocking(move || pdf.extract(&bytes))
        .await
        .map_err(|e| {
            RelayError::Extraction(ExtractError::Pdf(format!(
                "extraction task failed: {}",
                e
            )))
        })?
        .inspect_err(|e| tracing::warn!(filename = %filename, error = %e, "upload rejected"))?;

    let chars = char_len(&text);
    state.store.set_upload(filename.clone(), text);
    tracing::info!(filename = %filename, chars, "uploaded program file");

    Ok(Json(UploadResponse {
        ok: true,
        message: format!("Uploaded and extracted {} characters.", chars),
    }))
}

// ============ GET /api/document ============

async fn handle_document(State(state): State<AppState>) -> Json<DocumentStatus> {
    Json(state.store.status())
}
