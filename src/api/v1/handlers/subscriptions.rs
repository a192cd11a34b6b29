/*
 * Responsibility
 * - /subscriptions 系 handler (subscribe / rate / unsubscribe / 照会)
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::v1::dto::subscriptions::{RateRequest, SubscriptionResponse};
use crate::error::AppError;
use crate::repos::{restaurant_repo, subscription_repo};
use crate::state::AppState;

pub async fn subscribe(
    State(state): State<AppState>,
    Path((user_id, restaurant_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    if restaurant_repo::get(&state.db, restaurant_id).await?.is_none() {
        return Err(AppError::not_found("restaurant"));
    }

    let row = subscription_repo::subscribe(&state.db, user_id, restaurant_id)
        .await?
        .ok_or_else(|| AppError::bad_request("already subscribed"))?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_subscription(
    State(state): State<AppState>,
    Path((user_id, restaurant_id)): Path<(i64, i64)>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let row = subscription_repo::get(&state.db, user_id, restaurant_id)
        .await?
        .ok_or(AppError::not_found("subscription"))?;

    Ok(Json(row.into()))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let rows = subscription_repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(SubscriptionResponse::from).collect()))
}

pub async fn list_by_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let rows = subscription_repo::list_by_restaurant(&state.db, restaurant_id).await?;
    Ok(Json(rows.into_iter().map(SubscriptionResponse::from).collect()))
}

pub async fn rate(
    State(state): State<AppState>,
    Path((user_id, restaurant_id)): Path<(i64, i64)>,
    Json(req): Json<RateRequest>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::bad_request("rating must be between 1 and 5"));
    }

    let row = subscription_repo::rate(&state.db, user_id, restaurant_id, req.rating)
        .await?
        .ok_or(AppError::not_found("subscription"))?;

    Ok(Json(row.into()))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    Path((user_id, restaurant_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    if subscription_repo::unsubscribe(&state.db, user_id, restaurant_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("subscription"))
    }
}
