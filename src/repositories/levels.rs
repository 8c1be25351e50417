use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::errors::StoreError;
use crate::db::models::Level;
use crate::repositories::cascade::{self, CascadeScope, CascadeSummary};

const COLUMNS: &str = "id, name, created_at";

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    created_at: PrimitiveDateTime,
) -> Result<Level, StoreError> {
    let level = sqlx::query_as::<_, Level>(&format!(
        "INSERT INTO levels (id, name, created_at) VALUES ($1,$2,$3) RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(level)
}

/// Insert-if-missing by name. Returns whether a row was written.
pub(crate) async fn ensure(
    executor: impl sqlx::PgExecutor<'_>,
    name: &str,
    created_at: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO levels (id, name, created_at) VALUES ($1,$2,$3)
         ON CONFLICT ON CONSTRAINT levels_name_key DO NOTHING",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(name)
    .bind(created_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Level>, sqlx::Error> {
    sqlx::query_as::<_, Level>(&format!("SELECT {COLUMNS} FROM levels ORDER BY name"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<CascadeSummary, StoreError> {
    let mut tx = pool.begin().await?;

    let summary = cascade::delete_affected_users(&mut *tx, CascadeScope::Level(id)).await?;
    let result = sqlx::query("DELETE FROM levels WHERE id = $1").bind(id).execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("level"));
    }

    tx.commit().await?;
    Ok(summary)
}
