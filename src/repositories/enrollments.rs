use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::errors::StoreError;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub(crate) struct EnrolledStudent {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) student_number: String,
}

/// Returns false when the student was already enrolled.
pub(crate) async fn enroll(
    executor: impl sqlx::PgExecutor<'_>,
    student_id: &str,
    course_id: &str,
    enrolled_at: PrimitiveDateTime,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        "INSERT INTO student_courses (student_id, course_id, enrolled_at)
         VALUES ($1,$2,$3)
         ON CONFLICT (student_id, course_id) DO NOTHING",
    )
    .bind(student_id)
    .bind(course_id)
    .bind(enrolled_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn unenroll(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM student_courses WHERE student_id = $1 AND course_id = $2")
        .bind(student_id)
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_course_students(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<EnrolledStudent>, sqlx::Error> {
    sqlx::query_as::<_, EnrolledStudent>(
        "SELECT u.id, u.name, s.student_number
         FROM student_courses sc
         JOIN students s ON s.user_id = sc.student_id
         JOIN users u ON u.id = s.user_id
         WHERE sc.course_id = $1
         ORDER BY u.name, s.student_number",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// The subset of `student_ids` enrolled in the course.
pub(crate) async fn enrolled_ids_among(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    student_ids: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT student_id FROM student_courses
         WHERE course_id = $1 AND student_id = ANY($2)",
    )
    .bind(course_id)
    .bind(student_ids)
    .fetch_all(executor)
    .await
}

pub(crate) async fn attach_lecturer(
    pool: &PgPool,
    lecturer_id: &str,
    student_id: &str,
    assigned_at: PrimitiveDateTime,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        "INSERT INTO lecturer_students (lecturer_id, student_id, assigned_at)
         VALUES ($1,$2,$3)
         ON CONFLICT (lecturer_id, student_id) DO NOTHING",
    )
    .bind(lecturer_id)
    .bind(student_id)
    .bind(assigned_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn detach_lecturer(
    pool: &PgPool,
    lecturer_id: &str,
    student_id: &str,
) -> Result<bool, StoreError> {
    let result =
        sqlx::query("DELETE FROM lecturer_students WHERE lecturer_id = $1 AND student_id = $2")
            .bind(lecturer_id)
            .bind(student_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_lecturer_students(
    pool: &PgPool,
    lecturer_id: &str,
) -> Result<Vec<EnrolledStudent>, sqlx::Error> {
    sqlx::query_as::<_, EnrolledStudent>(
        "SELECT u.id, u.name, s.student_number
         FROM lecturer_students ls
         JOIN students s ON s.user_id = ls.student_id
         JOIN users u ON u.id = s.user_id
         WHERE ls.lecturer_id = $1
         ORDER BY u.name, s.student_number",
    )
    .bind(lecturer_id)
    .fetch_all(pool)
    .await
}
