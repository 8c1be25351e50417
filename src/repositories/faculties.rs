use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::errors::StoreError;
use crate::db::models::Faculty;
use crate::repositories::cascade::{self, CascadeScope, CascadeSummary};

const COLUMNS: &str = "id, name, created_at";

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    created_at: PrimitiveDateTime,
) -> Result<Faculty, StoreError> {
    let faculty = sqlx::query_as::<_, Faculty>(&format!(
        "INSERT INTO faculties (id, name, created_at) VALUES ($1,$2,$3) RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(faculty)
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Faculty>, sqlx::Error> {
    sqlx::query_as::<_, Faculty>(&format!("SELECT {COLUMNS} FROM faculties ORDER BY name"))
        .fetch_all(pool)
        .await
}

/// Deletes the faculty with everything under it, users included.
pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<CascadeSummary, StoreError> {
    let mut tx = pool.begin().await?;

    let summary = cascade::delete_affected_users(&mut *tx, CascadeScope::Faculty(id)).await?;
    let result = sqlx::query("DELETE FROM faculties WHERE id = $1").bind(id).execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("faculty"));
    }

    tx.commit().await?;
    Ok(summary)
}
