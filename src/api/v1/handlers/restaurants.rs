/*
 * Responsibility
 * - /restaurants 系 CRUD handler
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::v1::dto::restaurants::{
    CreateRestaurantRequest, RestaurantResponse, UpdateRestaurantRequest,
};
use crate::api::v1::extractors::CurrentUser;
use crate::error::AppError;
use crate::repos::restaurant_repo;
use crate::state::AppState;

pub async fn create_restaurant(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<RestaurantResponse>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::bad_request("name is required"));
    }

    // Created ownerless; an admin assigns an owner via promote later.
    let row = restaurant_repo::insert(
        &state.db,
        &req.name,
        req.category.as_deref(),
        req.address.as_deref(),
        req.description.as_deref(),
    )
    .await?;

    tracing::info!(restaurant = row.id, created_by = %principal.identity, "restaurant created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<RestaurantResponse>, AppError> {
    let row = restaurant_repo::get(&state.db, restaurant_id)
        .await?
        .ok_or(AppError::not_found("restaurant"))?;

    Ok(Json(row.into()))
}

pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantResponse>>, AppError> {
    let rows = restaurant_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(RestaurantResponse::from).collect()))
}

pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(req): Json<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantResponse>, AppError> {
    let row = restaurant_repo::update(
        &state.db,
        restaurant_id,
        req.name.as_deref(),
        req.category.as_deref(),
        req.address.as_deref(),
        req.description.as_deref(),
    )
    .await?
    .ok_or(AppError::not_found("restaurant"))?;

    Ok(Json(row.into()))
}

pub async fn remove_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if restaurant_repo::delete(&state.db, restaurant_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("restaurant"))
    }
}
