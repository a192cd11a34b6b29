/*
 * Responsibility
 * - subscriptions テーブル向け SQLx 操作
 * - rating 更新時に restaurant 側の平均 rating も更新する
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct SubscriptionRow {
    pub user_id: i64,
    pub restaurant_id: i64,
    pub rating: i32,
}

pub async fn get(
    db: &PgPool,
    user_id: i64,
    restaurant_id: i64,
) -> Result<Option<SubscriptionRow>, RepoError> {
    let row = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        SELECT user_id, restaurant_id, rating
        FROM subscriptions
        WHERE user_id = $1 AND restaurant_id = $2
        "#,
    )
    .bind(user_id)
    .bind(restaurant_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list_by_user(db: &PgPool, user_id: i64) -> Result<Vec<SubscriptionRow>, RepoError> {
    let rows = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        SELECT user_id, restaurant_id, rating
        FROM subscriptions
        WHERE user_id = $1
        ORDER BY restaurant_id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_by_restaurant(
    db: &PgPool,
    restaurant_id: i64,
) -> Result<Vec<SubscriptionRow>, RepoError> {
    let rows = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        SELECT user_id, restaurant_id, rating
        FROM subscriptions
        WHERE restaurant_id = $1
        ORDER BY user_id
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn subscribe(
    db: &PgPool,
    user_id: i64,
    restaurant_id: i64,
) -> Result<Option<SubscriptionRow>, RepoError> {
    let row = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        INSERT INTO subscriptions (user_id, restaurant_id, rating)
        VALUES ($1, $2, 0)
        ON CONFLICT (user_id, restaurant_id) DO NOTHING
        RETURNING user_id, restaurant_id, rating
        "#,
    )
    .bind(user_id)
    .bind(restaurant_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Set the caller's rating and refresh the restaurant's stored average.
pub async fn rate(
    db: &PgPool,
    user_id: i64,
    restaurant_id: i64,
    rating: i32,
) -> Result<Option<SubscriptionRow>, RepoError> {
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        UPDATE subscriptions
        SET rating = $3
        WHERE user_id = $1 AND restaurant_id = $2
        RETURNING user_id, restaurant_id, rating
        "#,
    )
    .bind(user_id)
    .bind(restaurant_id)
    .bind(rating)
    .fetch_optional(&mut *tx)
    .await?;

    if row.is_none() {
        tx.rollback().await?;
        return Ok(None);
    }

    // Unrated subscriptions (rating = 0) do not drag the average down.
    sqlx::query(
        r#"
        UPDATE restaurants
        SET rating = COALESCE(
            (SELECT AVG(rating)::float8 FROM subscriptions
             WHERE restaurant_id = $1 AND rating > 0),
            0
        )
        WHERE id = $1
        "#,
    )
    .bind(restaurant_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

pub async fn unsubscribe(db: &PgPool, user_id: i64, restaurant_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"DELETE FROM subscriptions WHERE user_id = $1 AND restaurant_id = $2"#,
    )
    .bind(user_id)
    .bind(restaurant_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
