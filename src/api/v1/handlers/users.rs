/*
 * Responsibility
 * - /users 系 CRUD handler
 * - 誰がアクセスできるかは routes 側の policy guard が決める。handler は
 *   業務ロジックのみ
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::v1::dto::users::{RegisterRequest, UpdateUserRequest, UserResponse};
use crate::error::AppError;
use crate::repos::user_repo;
use crate::services::auth::password;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    if req.email.trim().is_empty() || req.password.trim().is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }

    let hash = password::hash_password(&req.password)?;
    let row = user_repo::insert(
        &state.db,
        &req.name,
        &req.email,
        &hash,
        req.address.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn list_owners(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list_owners(&state.db).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let hash = match req.password.as_deref() {
        Some(p) => Some(password::hash_password(p)?),
        None => None,
    };

    let row = user_repo::update(
        &state.db,
        user_id,
        req.name.as_deref(),
        req.address.as_deref(),
        hash.as_deref(),
    )
    .await?
    .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn promote_user(
    State(state): State<AppState>,
    Path((user_id, restaurant_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    let outcome = user_repo::promote(&state.db, user_id, restaurant_id).await?;
    promote_response(outcome)
}

fn promote_response(outcome: user_repo::PromoteOutcome) -> Result<StatusCode, AppError> {
    use user_repo::PromoteOutcome;

    match outcome {
        PromoteOutcome::Promoted => Ok(StatusCode::OK),
        PromoteOutcome::NotFound => Err(AppError::not_found("user or restaurant")),
        PromoteOutcome::NotAClient => Err(AppError::bad_request("user is not a client")),
        PromoteOutcome::AlreadyOwned => Err(AppError::bad_request("restaurant already owned")),
    }
}

pub async fn demote_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if user_repo::demote(&state.db, user_id).await? {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::not_found("owner"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::user_repo::PromoteOutcome;

    #[test]
    fn promote_succeeds_only_for_a_free_restaurant_and_a_client() {
        assert!(matches!(
            promote_response(PromoteOutcome::Promoted),
            Ok(StatusCode::OK)
        ));
        assert!(matches!(
            promote_response(PromoteOutcome::NotFound),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn promote_refusals_are_bad_requests_with_the_reason() {
        // An admin must not be demoted-by-promotion, and an owned restaurant
        // must not change hands through this path.
        let not_a_client = promote_response(PromoteOutcome::NotAClient).unwrap_err();
        assert!(matches!(not_a_client, AppError::BadRequest(_)));
        assert_eq!(not_a_client.to_string(), "user is not a client");

        let already_owned = promote_response(PromoteOutcome::AlreadyOwned).unwrap_err();
        assert!(matches!(already_owned, AppError::BadRequest(_)));
        assert_eq!(already_owned.to_string(), "restaurant already owned");
    }
}
