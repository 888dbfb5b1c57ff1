use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use pathseeker_core::users;
use pathseeker_types::api::{MentorSearchQuery, UpdateProfileRequest};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::middleware::Claims;

pub async fn search_mentors(
    State(state): State<AppState>,
    Query(query): Query<MentorSearchQuery>,
    Extension(_claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let mentors = users::search_mentors(&state.db, &query.name_q, &query.domain_q)?;
    Ok(Json(mentors))
}

pub async fn mentor_profile(
    State(state): State<AppState>,
    Path(mentor_id): Path<i64>,
    Extension(_claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let profile = users::mentor_profile(&state.db, mentor_id)?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = users::update_profile(&state.db, &claims.identity(), &req)?;
    Ok(Json(user))
}
