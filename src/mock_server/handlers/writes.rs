//! Write handlers: every POST/PUT/DELETE is recorded and acknowledged.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::collections::unauthorized;
use crate::mock_server::state::{MockState, RecordedWrite};

/// Query parameters understood on write requests.
#[derive(Debug, Default, Deserialize)]
pub struct WriteQuery {
    pub access_token: Option<String>,
}

/// POST/PUT/DELETE /api/v1/{path}
pub async fn write(
    State(state): State<Arc<RwLock<MockState>>>,
    method: Method,
    Path(path): Path<String>,
    Query(query): Query<WriteQuery>,
    body: Bytes,
) -> Response {
    let mut state = state.write().await;

    if !state.is_token_valid(query.access_token.as_deref()) {
        return unauthorized();
    }

    let body: Option<Value> = serde_json::from_slice(&body).ok();
    state.writes.push(RecordedWrite {
        method: method.to_string(),
        path: path.trim_matches('/').to_string(),
        body: body.clone(),
    });

    let status = match method {
        Method::POST => StatusCode::CREATED,
        Method::DELETE => return StatusCode::NO_CONTENT.into_response(),
        _ => StatusCode::OK,
    };

    (status, Json(json!({ "ok": true, "received": body }))).into_response()
}
