use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use pathseeker_core::{feed, moments, similar};
use pathseeker_types::api::{CreateMomentRequest, CreateMomentResponse, PostReplyRequest};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::middleware::Claims;

pub async fn get_feed(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let identity = claims.identity();
    // Run blocking DB reads off the async runtime
    let db = state.clone();
    let moments = tokio::task::spawn_blocking(move || feed::list_feed(&db.db, &identity))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            anyhow::anyhow!("feed task failed")
        })??;
    Ok(Json(moments))
}

pub async fn student_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let moments = feed::student_dashboard(&state.db, &claims.identity())?;
    Ok(Json(moments))
}

pub async fn mentor_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let moments = feed::mentor_dashboard(&state.db, &claims.identity())?;
    Ok(Json(moments))
}

pub async fn create_moment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateMomentRequest>,
) -> ApiResult<impl IntoResponse> {
    let (moment, similar) = moments::create_moment(&state.db, &claims.identity(), &req)?;
    Ok((StatusCode::CREATED, Json(CreateMomentResponse { moment, similar })))
}

pub async fn view_moment(
    State(state): State<AppState>,
    Path(moment_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let identity = claims.identity();
    let db = state.clone();
    let detail = tokio::task::spawn_blocking(move || feed::view_moment(&db.db, &identity, moment_id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            anyhow::anyhow!("moment view task failed")
        })??;
    Ok(Json(detail))
}

pub async fn similar_moments(
    State(state): State<AppState>,
    Path(moment_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let hits = similar::similar_for_moment(&state.db, &claims.identity(), moment_id)?;
    Ok(Json(hits))
}

pub async fn resolve_moment(
    State(state): State<AppState>,
    Path(moment_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let moment = moments::resolve_moment(&state.db, &claims.identity(), moment_id)?;
    Ok(Json(moment))
}

pub async fn delete_moment(
    State(state): State<AppState>,
    Path(moment_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    moments::delete_moment(&state.db, &claims.identity(), moment_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn post_reply(
    State(state): State<AppState>,
    Path(moment_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PostReplyRequest>,
) -> ApiResult<impl IntoResponse> {
    let reply = moments::post_reply(&state.db, &claims.identity(), moment_id, &req)?;
    Ok((StatusCode::CREATED, Json(reply)))
}
