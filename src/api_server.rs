use crate::analyzer::{AnalysisData, Analyzer};
use crate::error::AnalysisError;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// -----------------------------------------------
// API RESPONSE ENVELOPE
// -----------------------------------------------

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
}

// -----------------------------------------------
// API HANDLERS
// -----------------------------------------------

/// GET /api/top-options - Run the analyzer and return the ranked result
async fn get_top_options(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<AnalysisData>>) {
    match state.analyzer.run().await {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
                message: Some("Top 3 most profitable options from Athena analysis".to_string()),
            }),
        ),
        Err(err) => {
            let status = match &err {
                AnalysisError::NoData => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ApiResponse {
                    success: false,
                    data: None,
                    error: Some(err.to_string()),
                    message: None,
                }),
            )
        }
    }
}

/// GET /api/health - Liveness probe
async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// -----------------------------------------------
// SERVER SETUP
// -----------------------------------------------

pub async fn start_server(analyzer: Arc<Analyzer>, port: u16) -> Result<()> {
    let app_state = AppState { analyzer };

    let app = Router::new()
        .route("/api/top-options", get(get_top_options))
        .route("/api/health", get(get_health))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Options API server running on http://{}", addr);
    println!("Available endpoints:");
    println!("   GET  /api/top-options");
    println!("   GET  /api/health");
    println!();

    axum::serve(listener, app).await?;
    Ok(())
}
