/*
 * Responsibility
 * - /dishes 系 CRUD handler
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::v1::dto::dishes::{CreateDishRequest, DishResponse, UpdateDishRequest};
use crate::error::AppError;
use crate::repos::{dish_repo, restaurant_repo};
use crate::state::AppState;

pub async fn create_dish(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(req): Json<CreateDishRequest>,
) -> Result<(StatusCode, Json<DishResponse>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::bad_request("name is required"));
    }
    if restaurant_repo::get(&state.db, restaurant_id).await?.is_none() {
        return Err(AppError::not_found("restaurant"));
    }

    let row = dish_repo::insert(
        &state.db,
        restaurant_id,
        &req.name,
        req.description.as_deref(),
        req.price,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_dish(
    State(state): State<AppState>,
    Path(dish_id): Path<i64>,
) -> Result<Json<DishResponse>, AppError> {
    let row = dish_repo::get(&state.db, dish_id)
        .await?
        .ok_or(AppError::not_found("dish"))?;

    Ok(Json(row.into()))
}

pub async fn list_dishes(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<Vec<DishResponse>>, AppError> {
    let rows = dish_repo::list_by_restaurant(&state.db, restaurant_id).await?;
    Ok(Json(rows.into_iter().map(DishResponse::from).collect()))
}

pub async fn update_dish(
    State(state): State<AppState>,
    Path(dish_id): Path<i64>,
    Json(req): Json<UpdateDishRequest>,
) -> Result<Json<DishResponse>, AppError> {
    let row = dish_repo::update(
        &state.db,
        dish_id,
        req.name.as_deref(),
        req.description.as_deref(),
        req.price,
    )
    .await?
    .ok_or(AppError::not_found("dish"))?;

    Ok(Json(row.into()))
}

pub async fn delete_dish(
    State(state): State<AppState>,
    Path(dish_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if dish_repo::delete(&state.db, dish_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("dish"))
    }
}
