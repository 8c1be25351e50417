use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::errors::StoreError;
use crate::db::models::Semester;

const COLUMNS: &str = "id, name, created_at";

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    created_at: PrimitiveDateTime,
) -> Result<Semester, StoreError> {
    let semester = sqlx::query_as::<_, Semester>(&format!(
        "INSERT INTO semesters (id, name, created_at) VALUES ($1,$2,$3) RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(semester)
}

pub(crate) async fn ensure(
    executor: impl sqlx::PgExecutor<'_>,
    name: &str,
    created_at: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO semesters (id, name, created_at) VALUES ($1,$2,$3)
         ON CONFLICT ON CONSTRAINT semesters_name_key DO NOTHING",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(name)
    .bind(created_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!("SELECT {COLUMNS} FROM semesters ORDER BY name"))
        .fetch_all(pool)
        .await
}

/// Courses go with the semester; their attendance records follow the course.
pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM semesters WHERE id = $1").bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("semester"));
    }
    Ok(())
}
