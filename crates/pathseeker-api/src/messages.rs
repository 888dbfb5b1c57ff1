use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use pathseeker_core::messages;
use pathseeker_types::api::SendMessageRequest;

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::middleware::Claims;

pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let view = messages::send(&state.db, &claims.identity(), chat_id, &req.content)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Listing a chat also marks the other side's messages as read; clients
/// poll this endpoint while the chat is open.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let identity = claims.identity();
    // Run blocking DB work off the async runtime
    let db = state.clone();
    let views =
        tokio::task::spawn_blocking(move || messages::list_messages(&db.db, &identity, chat_id))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                anyhow::anyhow!("message list task failed")
            })??;
    Ok(Json(views))
}

/// Read-only aggregation; polling notifications never flips read state.
pub async fn notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let summary = messages::notifications(&state.db, &claims.identity())?;
    Ok(Json(summary))
}
