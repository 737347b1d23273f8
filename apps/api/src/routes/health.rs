use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status along with the loaded embedding backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let embedder = state.matcher.embedder();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "embedder": embedder.name(),
        "dimension": embedder.dimension()
    }))
}
