//! Read handlers: paginated collections and single records.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::RATE_LIMIT_REMAINING;

/// Nonce echoed in every `next` reference.
pub const PAGE_NONCE: &str = "mocknonce";

/// Query parameters understood on GET requests.
#[derive(Debug, Default, Deserialize)]
pub struct ReadQuery {
    pub limit: Option<usize>,
    pub access_token: Option<String>,
    /// Offset of the first item on the requested page.
    #[serde(rename = "__token")]
    pub token: Option<String>,
}

/// GET /api/v1/{path}
pub async fn read(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(path): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Response {
    let mut state = state.write().await;

    if !state.is_token_valid(query.access_token.as_deref()) {
        return unauthorized();
    }

    state.reads += 1;
    let remaining = state.spend_rate_limit().to_string();
    let path = path.trim_matches('/');

    if let Some(record) = state.records.get(path) {
        return (
            StatusCode::OK,
            [(RATE_LIMIT_REMAINING, remaining)],
            Json(record.clone()),
        )
            .into_response();
    }

    let Some(items) = state.collection(path) else {
        return (
            StatusCode::NOT_FOUND,
            [(RATE_LIMIT_REMAINING, remaining)],
            Json(json!({
                "code": "not_found",
                "message": "Record not found"
            })),
        )
            .into_response();
    };

    let page_size = query
        .limit
        .unwrap_or(state.page_size)
        .min(state.page_size)
        .max(1);
    let offset = query
        .token
        .as_deref()
        .and_then(|t| t.parse::<usize>().ok())
        .unwrap_or(0)
        .min(items.len());
    let end = (offset + page_size).min(items.len());

    let next_offset = if end < items.len() {
        Some(end)
    } else if state.is_cyclic(path) {
        Some(0)
    } else {
        None
    };
    let next = next_offset.map(|o| format!("/api/v1/{path}?__nonce={PAGE_NONCE}&__token={o}"));

    (
        StatusCode::OK,
        [(RATE_LIMIT_REMAINING, remaining)],
        Json(json!({
            "page": offset / page_size + 1,
            "results": &items[offset..end],
            "next": next,
        })),
    )
        .into_response()
}

pub(crate) fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "code": "unauthorized",
            "message": "You are not authorized to access this content."
        })),
    )
        .into_response()
}
