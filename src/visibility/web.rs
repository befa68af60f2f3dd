use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::visibility::css;
use crate::visibility::resolver;
use crate::visibility::types::{DirectiveInfo, ResolveRequest, ResolveResponse};
use crate::visibility::VisibilityState;

pub fn router(state: Arc<VisibilityState>) -> Router {
    Router::new()
        .route("/v1/resolve", post(handle_resolve))
        .route("/v1/stylesheet", post(handle_stylesheet))
        .route("/healthz", get(health))
        .with_state(state)
}

/// Resolution is total: abnormal inputs produce an empty directive list, never
/// an error response.
async fn handle_resolve(
    State(state): State<Arc<VisibilityState>>,
    Json(req): Json<ResolveRequest>,
) -> impl IntoResponse {
    let directives = resolver::resolve(&req.groups, &state.fields, &state.rules);
    Json(ResolveResponse {
        directives: directives.iter().map(DirectiveInfo::from).collect(),
    })
}

/// The viewer's full stylesheet, hide blocks before the show blocks that
/// override them. Each block is headed by its stable element id.
async fn handle_stylesheet(
    State(state): State<Arc<VisibilityState>>,
    Json(req): Json<ResolveRequest>,
) -> impl IntoResponse {
    let directives = resolver::resolve(&req.groups, &state.fields, &state.rules);
    let body = directives
        .iter()
        .map(|d| format!("/* {} */\n{}", d.element_id(), css::render(d)))
        .collect::<Vec<_>>()
        .join("\n\n");
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], body)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
