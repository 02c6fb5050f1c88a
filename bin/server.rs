// EV S-Curve Engine - Web Server
// JSON API over the curve generator: phases, series, and metrics

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use ev_scurve::{CurveGenerator, EvMetrics, MonthlySample, Phase, PhaseSchedule, ProjectConfig};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state. The configuration is immutable for the life
/// of the process, so no lock is needed.
#[derive(Clone)]
struct AppState {
    config: Arc<ProjectConfig>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

/// Project summary response
#[derive(Serialize)]
struct ProjectResponse {
    project_name: String,
    start_date: String,
    horizon_months: u32,
    data_date: u32,
    data_date_label: String,
    phase_count: usize,
}

/// Phase response with its schedule (the ALL rollup has none)
#[derive(Serialize)]
struct PhaseResponse {
    id: String,
    display_name: String,
    bac: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<PhaseSchedule>,
}

impl PhaseResponse {
    fn new(phase: &Phase, schedule: Option<&PhaseSchedule>) -> Self {
        Self {
            id: phase.id.clone(),
            display_name: phase.display_name.clone(),
            bac: phase.bac,
            schedule: schedule.copied(),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/project - Project summary
async fn get_project(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    let response = ProjectResponse {
        project_name: config.project_name.clone(),
        start_date: config.start_date.to_string(),
        horizon_months: config.horizon_months,
        data_date: config.data_date,
        data_date_label: ev_scurve::month_label(config.start_date, config.data_date),
        phase_count: config.phases.len(),
    };
    Json(ApiResponse::ok(response))
}

/// GET /api/phases - Phase table with schedules
async fn get_phases(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    let response: Vec<PhaseResponse> = config
        .phases
        .iter()
        .map(|p| PhaseResponse::new(p, config.schedule(&p.id)))
        .collect();
    Json(ApiResponse::ok(response))
}

/// GET /api/series/:phase - Full monthly series for a phase
async fn get_series(
    State(state): State<AppState>,
    Path(phase_id): Path<String>,
) -> impl IntoResponse {
    let gen = CurveGenerator::new(&state.config);

    match gen.phase_series(&phase_id) {
        Some(series) => {
            (StatusCode::OK, Json(ApiResponse::<Vec<MonthlySample>>::ok(series))).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(format!("unknown phase '{}'", phase_id))),
        )
            .into_response(),
    }
}

/// GET /api/metrics/:phase - EV metrics snapshot at the data date
async fn get_metrics(
    State(state): State<AppState>,
    Path(phase_id): Path<String>,
) -> impl IntoResponse {
    let config = &state.config;
    let gen = CurveGenerator::new(config);

    let snapshot = config
        .phase(&phase_id)
        .and_then(|phase| {
            gen.data_date_sample(&phase_id)
                .map(|sample| EvMetrics::from_sample(&sample, phase.bac))
        });

    match snapshot {
        Some(metrics) => (StatusCode::OK, Json(ApiResponse::ok(metrics))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(format!("unknown phase '{}'", phase_id))),
        )
            .into_response(),
    }
}

/// GET / - Endpoint index
async fn serve_index() -> impl IntoResponse {
    Html(
        "<h1>EV S-Curve API</h1>\
         <ul>\
           <li><a href=\"/api/health\">/api/health</a></li>\
           <li><a href=\"/api/project\">/api/project</a></li>\
           <li><a href=\"/api/phases\">/api/phases</a></li>\
           <li><a href=\"/api/series/ALL\">/api/series/:phase</a></li>\
           <li><a href=\"/api/metrics/ALL\">/api/metrics/:phase</a></li>\
         </ul>",
    )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 EV S-Curve Engine - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Load configuration: optional JSON path argument, demo otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => ProjectConfig::from_json_file(std::path::Path::new(&path))
            .expect("Failed to load config file"),
        None => {
            let config = ProjectConfig::demo();
            config.validate().expect("Demo config must validate");
            config
        }
    };
    println!(
        "✓ Project loaded: {} ({} phases, {} months)",
        config.project_name,
        config.phases.len(),
        config.horizon_months
    );

    let state = AppState {
        config: Arc::new(config),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/project", get(get_project))
        .route("/phases", get(get_phases))
        .route("/series/:phase", get(get_series))
        .route("/metrics/:phase", get(get_metrics))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/series/ALL");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
