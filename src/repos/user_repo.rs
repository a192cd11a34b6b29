/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD を提供
 * - DB エラーは RepoError/AppError に変換しやすい形で返す
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub address: Option<String>,
    pub role: String,
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, name, email, password_hash, address, role
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn find_by_id(db: &PgPool, user_id: i64) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, name, email, password_hash, address, role
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list_owners(db: &PgPool) -> Result<Vec<UserRow>, RepoError> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, name, email, password_hash, address, role
        FROM users
        WHERE role = 'OWNER'
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
    email: &str,
    password_hash: &str,
    address: Option<&str>,
) -> Result<UserRow, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (name, email, password_hash, address, role)
        VALUES ($1, $2, $3, $4, 'CLIENT')
        RETURNING id, name, email, password_hash, address, role
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(address)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: i64,
    name: Option<&str>,
    address: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET
            name = COALESCE($2, name),
            address = COALESCE($3, address),
            password_hash = COALESCE($4, password_hash)
        WHERE id = $1
        RETURNING id, name, email, password_hash, address, role
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(address)
    .bind(password_hash)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// How a promotion attempt ended. Only clients can be promoted, and only
/// into a restaurant nobody owns yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteOutcome {
    Promoted,
    NotFound,
    NotAClient,
    AlreadyOwned,
}

/// Promote a client to owner of `restaurant_id`. Both updates land or neither.
pub async fn promote(
    db: &PgPool,
    user_id: i64,
    restaurant_id: i64,
) -> Result<PromoteOutcome, RepoError> {
    let mut tx = db.begin().await?;

    let role: Option<(String,)> = sqlx::query_as(r#"SELECT role FROM users WHERE id = $1"#)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    match role {
        None => return Ok(PromoteOutcome::NotFound),
        Some((role,)) if role != "CLIENT" => return Ok(PromoteOutcome::NotAClient),
        Some(_) => {}
    }

    let owner: Option<(Option<i64>,)> =
        sqlx::query_as(r#"SELECT owner_id FROM restaurants WHERE id = $1"#)
            .bind(restaurant_id)
            .fetch_optional(&mut *tx)
            .await?;
    match owner {
        None => return Ok(PromoteOutcome::NotFound),
        Some((Some(_),)) => return Ok(PromoteOutcome::AlreadyOwned),
        Some((None,)) => {}
    }

    // The WHERE clauses repeat the preconditions so a concurrent promote
    // cannot slip between the checks and the updates.
    let user = sqlx::query(r#"UPDATE users SET role = 'OWNER' WHERE id = $1 AND role = 'CLIENT'"#)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let restaurant = sqlx::query(
        r#"UPDATE restaurants SET owner_id = $1 WHERE id = $2 AND owner_id IS NULL"#,
    )
    .bind(user_id)
    .bind(restaurant_id)
    .execute(&mut *tx)
    .await?;

    if user.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(PromoteOutcome::NotAClient);
    }
    if restaurant.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(PromoteOutcome::AlreadyOwned);
    }

    tx.commit().await?;
    Ok(PromoteOutcome::Promoted)
}

/// Demote an owner back to client and release their restaurants.
pub async fn demote(db: &PgPool, user_id: i64) -> Result<bool, RepoError> {
    let mut tx = db.begin().await?;

    let user = sqlx::query(r#"UPDATE users SET role = 'CLIENT' WHERE id = $1 AND role = 'OWNER'"#)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if user.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(r#"UPDATE restaurants SET owner_id = NULL WHERE owner_id = $1"#)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

pub async fn email_of(db: &PgPool, user_id: i64) -> Result<Option<String>, RepoError> {
    let row: Option<(String,)> = sqlx::query_as(r#"SELECT email FROM users WHERE id = $1"#)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

    Ok(row.map(|(email,)| email))
}
