use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::repositories;
use crate::repositories::enrollments::EnrolledStudent;

#[derive(Debug, Serialize)]
struct CourseStudentsResponse {
    students: Vec<EnrolledStudent>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/get-students/:course_id", get(course_students))
}

/// Students enrolled in the course, the selectable rows of the marking form.
async fn course_students(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(course_id): Path<String>,
) -> Result<Json<CourseStudentsResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;
    if course.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let students = repositories::enrollments::list_course_students(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list course students"))?;

    Ok(Json(CourseStudentsResponse { students }))
}
