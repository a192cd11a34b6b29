/*
 * Responsibility
 * - dishes テーブル向け SQLx 操作
 * - dish の owner は restaurant 経由で解決する (dish 自体は owner を持たない)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct DishRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub restaurant_id: i64,
}

pub async fn get(db: &PgPool, dish_id: i64) -> Result<Option<DishRow>, RepoError> {
    let row = sqlx::query_as::<_, DishRow>(
        r#"
        SELECT id, name, description, price, restaurant_id
        FROM dishes
        WHERE id = $1
        "#,
    )
    .bind(dish_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list_by_restaurant(
    db: &PgPool,
    restaurant_id: i64,
) -> Result<Vec<DishRow>, RepoError> {
    let rows = sqlx::query_as::<_, DishRow>(
        r#"
        SELECT id, name, description, price, restaurant_id
        FROM dishes
        WHERE restaurant_id = $1
        ORDER BY id
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    restaurant_id: i64,
    name: &str,
    description: Option<&str>,
    price: f64,
) -> Result<DishRow, RepoError> {
    let row = sqlx::query_as::<_, DishRow>(
        r#"
        INSERT INTO dishes (name, description, price, restaurant_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, description, price, restaurant_id
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(restaurant_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    dish_id: i64,
    name: Option<&str>,
    description: Option<&str>,
    price: Option<f64>,
) -> Result<Option<DishRow>, RepoError> {
    let row = sqlx::query_as::<_, DishRow>(
        r#"
        UPDATE dishes
        SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price)
        WHERE id = $1
        RETURNING id, name, description, price, restaurant_id
        "#,
    )
    .bind(dish_id)
    .bind(name)
    .bind(description)
    .bind(price)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, dish_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(r#"DELETE FROM dishes WHERE id = $1"#)
        .bind(dish_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Owner identity of the restaurant this dish belongs to.
pub async fn owner_email(db: &PgPool, dish_id: i64) -> Result<Option<String>, RepoError> {
    let row: Option<(Option<String>,)> = sqlx::query_as(
        r#"
        SELECT u.email
        FROM dishes d
        JOIN restaurants r ON r.id = d.restaurant_id
        LEFT JOIN users u ON u.id = r.owner_id
        WHERE d.id = $1
        "#,
    )
    .bind(dish_id)
    .fetch_optional(db)
    .await?;

    Ok(row.and_then(|(email,)| email))
}
