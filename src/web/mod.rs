//! Minimal web front end.
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/` | GET | Empty form |
//! | `/analyze` | POST | Form submit (`statement=...`), renders results on the same page |
//! | `/api/analyze` | POST | JSON `{"statement": "..."}` in, breakdown out |
//! | `/healthz` | GET | Liveness |

pub mod page;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::aggregate::{Aggregator, Breakdown, Classifier, ClauseOutcome};
use crate::error::PipelineError;
use page::View;

/// The aggregator every request shares.
pub type SharedAggregator = Arc<Aggregator<dyn Classifier>>;

#[derive(Clone)]
struct AppState {
    aggregator: SharedAggregator,
}

/// Body of both analyze routes.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Free text, sentences separated by `.`.
    #[serde(default)]
    pub statement: String,
}

/// JSON answer of `/api/analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Percentages and overall label.
    #[serde(flatten)]
    pub breakdown: Breakdown,
    /// Clauses counted as neutral after a classifier failure.
    pub failures: usize,
    /// Per-clause detail.
    pub clauses: Vec<ClauseOutcome>,
}

/// Build the router.
pub fn router(aggregator: SharedAggregator) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze_form))
        .route("/api/analyze", post(analyze_json))
        .route("/healthz", get(healthz))
        .with_state(AppState { aggregator })
}

/// Serve `router` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on http://{addr}");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn index() -> Result<Html<String>, ApiError> {
    Ok(Html(page::render("", View::Blank)?))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn analyze_form(
    State(state): State<AppState>,
    Form(request): Form<AnalyzeRequest>,
) -> Result<Html<String>, ApiError> {
    let statement = request.statement;
    if statement.trim().is_empty() {
        let warning = PipelineError::EmptyInput.to_string();
        return Ok(Html(page::render(&statement, View::Warning(&warning))?));
    }

    let html = match state.aggregator.aggregate(&statement).await {
        Ok(report) => page::render(
            &statement,
            View::Results {
                breakdown: &report.breakdown,
                failures: report.failures(),
            },
        )?,
        Err(e) => {
            tracing::error!(error = %e, "aggregation failed");
            page::render(&statement, View::Error(&e.to_string()))?
        }
    };
    Ok(Html(html))
}

async fn analyze_json(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if request.statement.trim().is_empty() {
        return Err(ApiError(PipelineError::EmptyInput));
    }

    let report = state.aggregator.aggregate(&request.statement).await?;
    let failures = report.failures();
    Ok(Json(AnalyzeResponse {
        breakdown: report.breakdown,
        failures,
        clauses: report.clauses,
    }))
}

struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(value: PipelineError) -> Self {
        ApiError(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PipelineError::EmptyInput => StatusCode::UNPROCESSABLE_ENTITY,
            _ => {
                tracing::error!(error = %self.0, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
