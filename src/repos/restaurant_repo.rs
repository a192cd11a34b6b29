/*
 * Responsibility
 * - restaurants テーブル向け SQLx 操作
 * - owner_id は NULL 可。promote されるまで ownerless の状態が正規に存在する
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct RestaurantRow {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub owner_id: Option<i64>,
}

pub async fn get(db: &PgPool, restaurant_id: i64) -> Result<Option<RestaurantRow>, RepoError> {
    let row = sqlx::query_as::<_, RestaurantRow>(
        r#"
        SELECT id, name, category, address, description, rating, owner_id
        FROM restaurants
        WHERE id = $1
        "#,
    )
    .bind(restaurant_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool) -> Result<Vec<RestaurantRow>, RepoError> {
    let rows = sqlx::query_as::<_, RestaurantRow>(
        r#"
        SELECT id, name, category, address, description, rating, owner_id
        FROM restaurants
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    name: &str,
    category: Option<&str>,
    address: Option<&str>,
    description: Option<&str>,
) -> Result<RestaurantRow, RepoError> {
    let row = sqlx::query_as::<_, RestaurantRow>(
        r#"
        INSERT INTO restaurants (name, category, address, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, category, address, description, rating, owner_id
        "#,
    )
    .bind(name)
    .bind(category)
    .bind(address)
    .bind(description)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    restaurant_id: i64,
    name: Option<&str>,
    category: Option<&str>,
    address: Option<&str>,
    description: Option<&str>,
) -> Result<Option<RestaurantRow>, RepoError> {
    let row = sqlx::query_as::<_, RestaurantRow>(
        r#"
        UPDATE restaurants
        SET
            name = COALESCE($2, name),
            category = COALESCE($3, category),
            address = COALESCE($4, address),
            description = COALESCE($5, description)
        WHERE id = $1
        RETURNING id, name, category, address, description, rating, owner_id
        "#,
    )
    .bind(restaurant_id)
    .bind(name)
    .bind(category)
    .bind(address)
    .bind(description)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, restaurant_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(r#"DELETE FROM restaurants WHERE id = $1"#)
        .bind(restaurant_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Owner identity of a restaurant. `None` for both "no such restaurant" and
/// "no owner assigned".
pub async fn owner_email(db: &PgPool, restaurant_id: i64) -> Result<Option<String>, RepoError> {
    let row: Option<(Option<String>,)> = sqlx::query_as(
        r#"
        SELECT u.email
        FROM restaurants r
        LEFT JOIN users u ON u.id = r.owner_id
        WHERE r.id = $1
        "#,
    )
    .bind(restaurant_id)
    .fetch_optional(db)
    .await?;

    Ok(row.and_then(|(email,)| email))
}
