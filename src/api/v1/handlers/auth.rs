/*
 * Responsibility
 * - POST /users/authenticate: login entry point
 * - 検証・発行は services::auth 側。handler は DTO の詰め替えのみ
 */
use axum::{Json, extract::State};

use crate::api::v1::dto::auth::{AuthRequest, TokenResponse};
use crate::error::AppError;
use crate::services::auth::authenticate;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = authenticate::authenticate(
        state.credentials.as_ref(),
        &state.tokens,
        &req.email,
        &req.password,
    )
    .await?;

    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        token_type: issued.token_type.to_string(),
        expires_in: issued.expires_in,
    }))
}
