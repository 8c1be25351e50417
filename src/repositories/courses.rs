use sqlx::PgPool;

use crate::db::errors::StoreError;
use crate::db::models::Course;

const COURSE_COLUMNS: &str = "id, name, department_id, semester_id, lecturer_id, created_at";

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) department_id: &'a str,
    pub(crate) semester_id: &'a str,
    pub(crate) lecturer_id: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, StoreError> {
    let course = sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (id, name, department_id, semester_id, lecturer_id, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.department_id)
    .bind(params.semester_id)
    .bind(params.lecturer_id)
    .bind(params.created_at)
    .fetch_one(pool)
    .await?;
    Ok(course)
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    semester_id: Option<&str>,
    department_id: Option<&str>,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses
         WHERE ($1::text IS NULL OR semester_id = $1)
           AND ($2::text IS NULL OR department_id = $2)
         ORDER BY name, id"
    ))
    .bind(semester_id)
    .bind(department_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_lecturer(
    pool: &PgPool,
    lecturer_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE lecturer_id = $1 ORDER BY name, id"
    ))
    .bind(lecturer_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT c.id, c.name, c.department_id, c.semester_id, c.lecturer_id, c.created_at
         FROM courses c
         JOIN student_courses sc ON sc.course_id = c.id
         WHERE sc.student_id = $1
         ORDER BY c.name, c.id",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// `None` unassigns the course.
pub(crate) async fn assign_lecturer(
    pool: &PgPool,
    course_id: &str,
    lecturer_id: Option<&str>,
) -> Result<Course, StoreError> {
    sqlx::query_as::<_, Course>(&format!(
        "UPDATE courses SET lecturer_id = $1 WHERE id = $2 RETURNING {COURSE_COLUMNS}"
    ))
    .bind(lecturer_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound("course"))
}

pub(crate) async fn delete(pool: &PgPool, course_id: &str) -> Result<(), StoreError> {
    let result =
        sqlx::query("DELETE FROM courses WHERE id = $1").bind(course_id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("course"));
    }
    Ok(())
}
