use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use pathseeker_core::chat;
use pathseeker_types::api::{StartChatRequest, VideoRoomResponse};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::middleware::Claims;

pub async fn start_chat(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<StartChatRequest>,
) -> ApiResult<impl IntoResponse> {
    let chat = chat::get_or_create_chat(&state.db, &claims.identity(), req.mentor_id)?;
    Ok((StatusCode::CREATED, Json(chat)))
}

pub async fn list_chats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let chats = chat::list_chats(&state.db, &claims.identity())?;
    Ok(Json(chats))
}

pub async fn delete_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    chat::delete_chat(&state.db, &claims.identity(), chat_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn video_room(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let room_name = chat::video_room_name(&state.db, &claims.identity(), chat_id)?;
    Ok(Json(VideoRoomResponse { room_name }))
}
