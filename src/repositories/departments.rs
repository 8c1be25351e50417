use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::errors::StoreError;
use crate::db::models::Department;
use crate::repositories::cascade::{self, CascadeScope, CascadeSummary};

const COLUMNS: &str = "id, name, faculty_id, created_at";

pub(crate) struct CreateDepartment<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) faculty_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateDepartment<'_>,
) -> Result<Department, StoreError> {
    let department = sqlx::query_as::<_, Department>(&format!(
        "INSERT INTO departments (id, name, faculty_id, created_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.faculty_id)
    .bind(params.created_at)
    .fetch_one(pool)
    .await?;
    Ok(department)
}

pub(crate) async fn list(
    pool: &PgPool,
    faculty_id: Option<&str>,
) -> Result<Vec<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>(&format!(
        "SELECT {COLUMNS} FROM departments
         WHERE ($1::text IS NULL OR faculty_id = $1)
         ORDER BY name"
    ))
    .bind(faculty_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<CascadeSummary, StoreError> {
    let mut tx = pool.begin().await?;

    let summary = cascade::delete_affected_users(&mut *tx, CascadeScope::Department(id)).await?;
    let result =
        sqlx::query("DELETE FROM departments WHERE id = $1").bind(id).execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("department"));
    }

    tx.commit().await?;
    Ok(summary)
}
