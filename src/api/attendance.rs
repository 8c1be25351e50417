use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::FormOrJson;
use crate::api::guards::{CurrentLecturer, CurrentUser};
use crate::api::pagination::{self, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::parse_calendar_date;
use crate::db::models::Account;
use crate::repositories;
use crate::repositories::attendance::{HistoryFilter, HistoryScope};
use crate::schemas::attendance::{
    AttendanceHistoryResponse, AttendanceRecordResponse, HistoryItem, HistoryQuery,
    MarkAttendanceOptions, MarkAttendanceOptionsQuery, MarkAttendanceRequest,
    MarkAttendanceResponse, StatusChoice,
};
use crate::schemas::Choice;
use crate::services::attendance_marking::{self, MarkError, MarkRequest};
use crate::services::attendance_stats::StatusCounts;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/mark-attendance", get(mark_options).post(mark_attendance))
        .route("/attendance-record", get(attendance_record))
}

async fn mark_options(
    State(state): State<AppState>,
    lecturer: CurrentLecturer,
    Query(query): Query<MarkAttendanceOptionsQuery>,
) -> Result<Json<MarkAttendanceOptions>, ApiError> {
    let courses = repositories::courses::list_for_lecturer(state.db(), &lecturer.user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(MarkAttendanceOptions {
        courses: courses.into_iter().map(|course| Choice::new(course.id, course.name)).collect(),
        statuses: StatusChoice::all(),
        selected_course_id: query.course_id,
    }))
}

fn mark_error(err: MarkError) -> ApiError {
    let message = err.to_string();
    match err {
        MarkError::CourseNotFound => ApiError::NotFound("Course not found".to_string()),
        MarkError::NotCourseOwner => ApiError::Forbidden("Course is not taught by you"),
        MarkError::ForeignClassSession => ApiError::BadRequest("Invalid selection".to_string()),
        MarkError::NotEnrolled(_) => ApiError::BadRequest(format!("Invalid selection: {message}")),
        MarkError::EmptySelection => {
            ApiError::single_field("student_ids", "select at least one student")
        }
        MarkError::Store(store) => ApiError::from_store(store, "Attendance record"),
    }
}

async fn mark_attendance(
    State(state): State<AppState>,
    lecturer: CurrentLecturer,
    FormOrJson(payload): FormOrJson<MarkAttendanceRequest>,
) -> Result<(StatusCode, Json<MarkAttendanceResponse>), ApiError> {
    payload.validate()?;

    let outcome = attendance_marking::mark(
        state.db(),
        MarkRequest {
            lecturer_id: lecturer.user.id.clone(),
            course_id: payload.course_id.trim().to_string(),
            student_ids: payload.student_ids,
            status: payload.status,
            class_session_id: payload.class_session_id,
        },
    )
    .await
    .map_err(mark_error)?;

    tracing::info!(
        lecturer_id = %lecturer.user.id,
        course_id = %payload.course_id,
        status = payload.status.as_str(),
        created = outcome.created.len(),
        skipped = outcome.skipped.len(),
        action = "mark_attendance",
        "Attendance marked"
    );

    let created = outcome.created.len();
    Ok((
        StatusCode::CREATED,
        Json(MarkAttendanceResponse {
            message: format!("Attendance successfully marked for {created} student(s)."),
            created,
            skipped: outcome.skipped,
            records: outcome.created.into_iter().map(AttendanceRecordResponse::from).collect(),
        }),
    ))
}

fn history_filter(query: &HistoryQuery) -> Result<HistoryFilter, ApiError> {
    let date = query
        .date
        .as_deref()
        .map(parse_calendar_date)
        .transpose()
        .map_err(|_| ApiError::single_field("date", "date must be formatted as YYYY-MM-DD"))?;

    Ok(HistoryFilter {
        semester_id: query.semester_id.clone(),
        course_id: query.course_id.clone(),
        date,
    })
}

async fn attendance_record(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<AttendanceHistoryResponse>, ApiError> {
    let filter = history_filter(&query)?;
    let (skip, limit) = pagination::clamp(query.skip, query.limit);

    let (scope, courses) = match &account {
        Account::Student { user, .. } => (
            HistoryScope::Student(&user.id),
            repositories::courses::list_for_student(state.db(), &user.id).await,
        ),
        Account::Lecturer { user, .. } => (
            HistoryScope::Lecturer(&user.id),
            repositories::courses::list_for_lecturer(state.db(), &user.id).await,
        ),
        Account::Admin { .. } => {
            return Err(ApiError::Forbidden("Attendance history is for students and lecturers"));
        }
    };
    let courses = courses.map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    let rows = repositories::attendance::history(state.db(), scope, &filter, skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch attendance history"))?;
    let total_count = repositories::attendance::count(state.db(), scope, &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count attendance history"))?;
    let counts = repositories::attendance::status_counts(state.db(), scope, &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count attendance statuses"))?;
    let semesters = repositories::semesters::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list semesters"))?;

    Ok(Json(AttendanceHistoryResponse {
        page: PaginatedResponse {
            items: rows.into_iter().map(HistoryItem::from).collect(),
            total_count,
            skip,
            limit,
        },
        counts: StatusCounts::from_rows(counts),
        semesters: semesters
            .into_iter()
            .map(|semester| Choice::new(semester.id, semester.name))
            .collect(),
        courses: courses.into_iter().map(|course| Choice::new(course.id, course.name)).collect(),
    }))
}
