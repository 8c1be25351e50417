use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::UserSession;

const COLUMNS: &str = "id, user_id, created_at, expires_at";

pub(crate) struct CreateSession<'a> {
    pub(crate) id: &'a str,
    pub(crate) token_hash: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) expires_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSession<'_>,
) -> Result<UserSession, sqlx::Error> {
    sqlx::query_as::<_, UserSession>(&format!(
        "INSERT INTO user_sessions (id, token_hash, user_id, created_at, expires_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.token_hash)
    .bind(params.user_id)
    .bind(params.created_at)
    .bind(params.expires_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_active_by_token_hash(
    pool: &PgPool,
    token_hash: &str,
    now: PrimitiveDateTime,
) -> Result<Option<UserSession>, sqlx::Error> {
    sqlx::query_as::<_, UserSession>(&format!(
        "SELECT {COLUMNS} FROM user_sessions WHERE token_hash = $1 AND expires_at > $2"
    ))
    .bind(token_hash)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_token_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_sessions WHERE token_hash = $1")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Housekeeping run on every login so expired rows do not pile up.
pub(crate) async fn delete_expired(
    pool: &PgPool,
    user_id: &str,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1 AND expires_at <= $2")
        .bind(user_id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
