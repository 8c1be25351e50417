use std::collections::HashSet;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::errors::StoreError;
use crate::db::models::AttendanceRecord;
use crate::db::types::AttendanceStatus;
use crate::repositories::attendance::NewAttendance;

#[derive(Debug, Error)]
pub(crate) enum MarkError {
    #[error("course not found")]
    CourseNotFound,
    #[error("course is not taught by this lecturer")]
    NotCourseOwner,
    #[error("class session is not owned by this lecturer")]
    ForeignClassSession,
    #[error("{} student(s) are not enrolled in the course", .0.len())]
    NotEnrolled(Vec<String>),
    #[error("no students selected")]
    EmptySelection,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for MarkError {
    fn from(error: sqlx::Error) -> Self {
        MarkError::Store(StoreError::from(error))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MarkRequest {
    pub(crate) lecturer_id: String,
    pub(crate) course_id: String,
    pub(crate) student_ids: Vec<String>,
    pub(crate) status: AttendanceStatus,
    pub(crate) class_session_id: Option<String>,
}

#[derive(Debug)]
pub(crate) struct MarkOutcome {
    pub(crate) created: Vec<AttendanceRecord>,
    /// Students who already had a record for this course, class and day.
    pub(crate) skipped: Vec<String>,
}

/// Trims ids, drops blanks and repeats, and keeps first-seen order.
pub(crate) fn dedupe_student_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}

/// Records one status for every selected student in a single transaction.
pub(crate) async fn mark(pool: &PgPool, request: MarkRequest) -> Result<MarkOutcome, MarkError> {
    let student_ids = dedupe_student_ids(&request.student_ids);
    if student_ids.is_empty() {
        return Err(MarkError::EmptySelection);
    }

    let mut tx = pool.begin().await?;

    let course = crate::repositories::courses::find_by_id(&mut *tx, &request.course_id)
        .await?
        .ok_or(MarkError::CourseNotFound)?;
    if course.lecturer_id.as_deref() != Some(request.lecturer_id.as_str()) {
        return Err(MarkError::NotCourseOwner);
    }

    if let Some(class_session_id) = request.class_session_id.as_deref() {
        let session = crate::repositories::class_sessions::find_by_id(&mut *tx, class_session_id)
            .await?
            .ok_or(MarkError::ForeignClassSession)?;
        if session.lecturer_id != request.lecturer_id {
            return Err(MarkError::ForeignClassSession);
        }
    }

    let enrolled: HashSet<String> =
        crate::repositories::enrollments::enrolled_ids_among(&mut *tx, &course.id, &student_ids)
            .await?
            .into_iter()
            .collect();
    let not_enrolled: Vec<String> =
        student_ids.iter().filter(|id| !enrolled.contains(*id)).cloned().collect();
    if !not_enrolled.is_empty() {
        return Err(MarkError::NotEnrolled(not_enrolled));
    }

    let recorded_at = primitive_now_utc();
    let rows: Vec<NewAttendance<'_>> = student_ids
        .iter()
        .map(|student_id| NewAttendance {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.as_str(),
            course_id: &course.id,
            lecturer_id: &request.lecturer_id,
            class_session_id: request.class_session_id.as_deref(),
            status: request.status,
            recorded_at,
        })
        .collect();

    let created = crate::repositories::attendance::insert_batch(&mut *tx, &rows).await?;
    tx.commit().await?;

    let written: HashSet<&str> = created.iter().map(|record| record.student_id.as_str()).collect();
    let skipped: Vec<String> =
        student_ids.iter().filter(|id| !written.contains(id.as_str())).cloned().collect();

    crate::core::metrics::record_attendance_marked(
        request.status,
        created.len() as u64,
        skipped.len() as u64,
    );

    Ok(MarkOutcome { created, skipped })
}
