use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use pathseeker_core::ratings;
use pathseeker_types::api::{RateReplyRequest, RateReplyResponse};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::middleware::Claims;

pub async fn rate_reply(
    State(state): State<AppState>,
    Path(reply_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RateReplyRequest>,
) -> ApiResult<impl IntoResponse> {
    let rating = ratings::rate(&state.db, &claims.identity(), reply_id, req.value)?;
    Ok((StatusCode::CREATED, Json(RateReplyResponse { rating })))
}
