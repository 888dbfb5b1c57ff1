use axum::{Extension, Json, extract::State, response::IntoResponse};

use pathseeker_core::CoreError;
use pathseeker_types::api::{AdviceRequest, AdviceResponse};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::middleware::Claims;

/// The assistant fails closed inside the advice client, so this handler
/// always answers 200 with either advice or an explanatory fallback.
pub async fn ask_advice(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<AdviceRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.message.trim().is_empty() {
        return Err(CoreError::InvalidInput("No message provided").into());
    }
    let response = state.advice.advise(req.message.trim()).await;
    Ok(Json(AdviceResponse { response }))
}
