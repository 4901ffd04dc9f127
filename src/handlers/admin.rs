use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::CallSession;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/calls
#[derive(Serialize)]
pub struct CallsResponse {
    pub count: usize,
    pub calls: Vec<CallSession>,
}

pub async fn list_calls(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CallsResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let calls = state.sessions.snapshot();
    Ok(Json(CallsResponse {
        count: calls.len(),
        calls,
    }))
}

// GET /api/calls/:call_sid
pub async fn get_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(call_sid): Path<String>,
) -> Result<Json<CallSession>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    state
        .sessions
        .get(&call_sid)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("call {call_sid}")))
}
