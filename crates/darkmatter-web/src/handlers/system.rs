//! Liveness probe.

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::SharedState;

pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    let uptime = Utc::now() - state.started_at;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime.num_seconds(),
        "sessions": state.sessions.len().await,
    }))
}
