use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, SecondsFormat, Utc};
use kitting_core::{
    has_errors, validate_elements, validation_error, BoqElement, KitError, KitOptimizer, KitPlan,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const OPENAPI_SPEC: &str = include_str!("../../../openapi.yaml");
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Kitting Optimizer API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: '/openapi.yaml',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
            });
        };
    </script>
</body>
</html>"#;

/// Request body of `POST /api/optimize-kitting`.
#[derive(Debug, Deserialize)]
struct OptimizeRequest {
    items: Vec<BoqElement>,
}

/// One row of the run history kept for the dashboard.
#[derive(Debug, Clone, Serialize)]
struct RunRecord {
    run_id: String,
    date: NaiveDate,
    elements: usize,
    total_units: u64,
    kits: u64,
    savings_percent: f64,
    execution_time_ms: String,
    status: &'static str,
}

/// Per-kit-type deployment projection derived from the latest plan.
#[derive(Debug, Clone, Serialize)]
struct InventoryRow {
    kit_id: String,
    kit_type: String,
    total: u32,
    deployed: u32,
    available: u32,
    utilization_percent: u32,
}

/// Shared across handlers; each optimization run is otherwise independent.
#[derive(Clone, Default)]
struct AppState {
    runs: Arc<RwLock<Vec<RunRecord>>>,
    latest_plan: Arc<RwLock<Option<KitPlan>>>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Kitting Optimizer API");

    let state = AppState::default();

    let app = Router::new()
        .route("/", get(serve_ui))
        .route("/api/health", get(health_check))
        .route("/api/optimize-kitting", post(optimize))
        .route("/api/history", get(history))
        .route("/api/inventory", get(inventory))
        .route("/openapi.yaml", get(serve_openapi_spec))
        .route("/docs", get(serve_swagger_ui))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr =
        std::env::var("KITTING_API_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {addr}: {e}"));

    info!("API server listening on http://{addr}");
    info!("Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app).await.expect("Server error");
}

/// Liveness probe for the dashboard's connection indicator
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "kitting-optimizer-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main optimization endpoint
async fn optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<KitPlan>, AppError> {
    let element_count = request.items.len();
    info!("Received kitting request with {} BoQ elements", element_count);

    let report = validate_elements(&request.items);
    if has_errors(&report) {
        return Err(validation_error(&report).into());
    }

    let optimizer = KitOptimizer::new(request.items)?;
    let started = Instant::now();
    let plan = optimizer.optimize();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let run_id = format!("RUN-{}", Uuid::new_v4().simple());
    let plan = plan.with_provenance(
        run_id,
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        format!("{elapsed_ms:.2} ms"),
    );

    info!(
        "Optimization complete: {} kits for {} units ({:.2}% saving)",
        plan.optimized_kits_required,
        plan.original_boq_items,
        plan.estimated_cost_savings_percent
    );

    record_run(&state, element_count, &plan).await;

    Ok(Json(plan))
}

async fn record_run(state: &AppState, element_count: usize, plan: &KitPlan) {
    let record = RunRecord {
        run_id: plan.run_id.clone().unwrap_or_default(),
        date: Utc::now().date_naive(),
        elements: element_count,
        total_units: plan.original_boq_items,
        kits: plan.optimized_kits_required,
        savings_percent: plan.estimated_cost_savings_percent,
        execution_time_ms: plan.execution_time_ms.clone().unwrap_or_default(),
        status: "completed",
    };

    state.runs.write().await.push(record);
    *state.latest_plan.write().await = Some(plan.clone());
}

/// Recorded runs, most recent first
async fn history(State(state): State<AppState>) -> Json<Vec<RunRecord>> {
    let mut runs = state.runs.read().await.clone();
    runs.reverse();
    Json(runs)
}

/// Kit deployment projection for the latest plan; empty before the first run
async fn inventory(State(state): State<AppState>) -> Json<Vec<InventoryRow>> {
    let latest = state.latest_plan.read().await;
    let rows = match latest.as_ref() {
        Some(plan) => plan
            .kit_details
            .iter()
            .enumerate()
            .map(|(idx, kit)| {
                // Share of the theoretical reuse ceiling actually consumed
                let utilization = ((kit.repetition_count
                    / kit.material.reuse_limit() as f64)
                    * 100.0)
                    .round()
                    .min(100.0) as u32;
                let deployed = kit.required_qty * utilization / 100;

                InventoryRow {
                    kit_id: format!("KIT-{:03}", idx + 1),
                    kit_type: kit.dimensions.replace('|', " "),
                    total: kit.required_qty,
                    deployed,
                    available: kit.required_qty - deployed,
                    utilization_percent: utilization,
                }
            })
            .collect(),
        None => Vec::new(),
    };

    Json(rows)
}

/// Application error type
struct AppError {
    status: StatusCode,
    message: String,
}

impl From<KitError> for AppError {
    fn from(err: KitError) -> Self {
        // Both validation and empty-input failures are caller faults
        AppError {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.message);

        (
            self.status,
            Json(json!({
                "error": self.message,
            })),
        )
            .into_response()
    }
}

async fn serve_ui() -> impl IntoResponse {
    // The dashboard ships separately; serve it if a build was dropped in
    match std::fs::read_to_string("web/index.html") {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <title>Kitting Optimizer</title>
            </head>
            <body>
                <h1>Formwork Kitting Optimizer API</h1>
                <p>Web UI build not found. Place the dashboard bundle at web/index.html.</p>
                <h2>API Endpoints:</h2>
                <ul>
                    <li>GET /api/health - Health check</li>
                    <li>POST /api/optimize-kitting - Run kitting optimization</li>
                    <li>GET /api/history - Recorded optimization runs</li>
                    <li>GET /api/inventory - Kit deployment projection</li>
                </ul>
            </body>
            </html>
        "#
            .to_string(),
        ),
    }
}

async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("Content-Type", "application/yaml")],
        OPENAPI_SPEC,
    )
}

async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
