use sqlx::PgPool;

use crate::db::errors::StoreError;
use crate::db::models::ClassSession;

const COLUMNS: &str =
    "id, course_code, title, time_label, department_id, level_id, lecturer_id, created_at";

pub(crate) struct CreateClassSession<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_code: &'a str,
    pub(crate) title: &'a str,
    pub(crate) time_label: &'a str,
    pub(crate) department_id: &'a str,
    pub(crate) level_id: &'a str,
    pub(crate) lecturer_id: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateClassSession<'_>,
) -> Result<ClassSession, StoreError> {
    let session = sqlx::query_as::<_, ClassSession>(&format!(
        "INSERT INTO class_sessions (
            id, course_code, title, time_label, department_id, level_id, lecturer_id, created_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.course_code)
    .bind(params.title)
    .bind(params.time_label)
    .bind(params.department_id)
    .bind(params.level_id)
    .bind(params.lecturer_id)
    .bind(params.created_at)
    .fetch_one(pool)
    .await?;
    Ok(session)
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<ClassSession>, sqlx::Error> {
    sqlx::query_as::<_, ClassSession>(&format!("SELECT {COLUMNS} FROM class_sessions WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn list_for_lecturer(
    pool: &PgPool,
    lecturer_id: &str,
    skip: i64,
    limit: i64,
) -> Result<(Vec<ClassSession>, i64), sqlx::Error> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM class_sessions WHERE lecturer_id = $1",
    )
    .bind(lecturer_id)
    .fetch_one(pool)
    .await?;

    let items = sqlx::query_as::<_, ClassSession>(&format!(
        "SELECT {COLUMNS} FROM class_sessions
         WHERE lecturer_id = $1
         ORDER BY created_at DESC, id DESC
         OFFSET $2 LIMIT $3"
    ))
    .bind(lecturer_id)
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok((items, total))
}

pub(crate) async fn list_for_department_level(
    pool: &PgPool,
    department_id: &str,
    level_id: &str,
    limit: i64,
) -> Result<Vec<ClassSession>, sqlx::Error> {
    sqlx::query_as::<_, ClassSession>(&format!(
        "SELECT {COLUMNS} FROM class_sessions
         WHERE department_id = $1 AND level_id = $2
         ORDER BY created_at DESC, id DESC
         LIMIT $3"
    ))
    .bind(department_id)
    .bind(level_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Number of classes scheduled for a department and level, the denominator of
/// a student's attendance percentage.
pub(crate) async fn count_for_department_level(
    pool: &PgPool,
    department_id: &str,
    level_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM class_sessions WHERE department_id = $1 AND level_id = $2",
    )
    .bind(department_id)
    .bind(level_id)
    .fetch_one(pool)
    .await
}
