use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::{format_dashboard_date, primitive_now_utc};
use crate::db::models::Account;
use crate::repositories;
use crate::repositories::attendance::{HistoryFilter, HistoryScope};
use crate::schemas::academic::CourseResponse;
use crate::schemas::class_session::ClassSessionResponse;
use crate::schemas::dashboard::{DashboardResponse, LecturerDashboard, StudentDashboard};
use crate::schemas::user::UserResponse;
use crate::services::attendance_stats;

/// Sessions listed on the student dashboard.
const DASHBOARD_CLASS_LIMIT: i64 = 50;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let response = match &account {
        Account::Student { user, profile } => {
            let stats = attendance_stats::student_summary(
                state.db(),
                &user.id,
                &profile.department_id,
                &profile.level_id,
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to compute attendance summary"))?;

            let classes = repositories::class_sessions::list_for_department_level(
                state.db(),
                &profile.department_id,
                &profile.level_id,
                DASHBOARD_CLASS_LIMIT,
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;

            let courses = repositories::courses::list_for_student(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

            DashboardResponse::Student(StudentDashboard {
                user: UserResponse::from_account(&account),
                stats,
                classes: classes.into_iter().map(ClassSessionResponse::from).collect(),
                courses: courses.into_iter().map(CourseResponse::from).collect(),
                current_date: format_dashboard_date(primitive_now_utc().date()),
            })
        }
        Account::Lecturer { user, .. } => {
            let courses = repositories::courses::list_for_lecturer(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
            let (_, class_count) =
                repositories::class_sessions::list_for_lecturer(state.db(), &user.id, 0, 1)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to count classes"))?;
            let records_marked = repositories::attendance::count(
                state.db(),
                HistoryScope::Lecturer(&user.id),
                &HistoryFilter::default(),
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count attendance records"))?;

            DashboardResponse::Lecturer(LecturerDashboard {
                user: UserResponse::from_account(&account),
                courses: courses.into_iter().map(CourseResponse::from).collect(),
                class_count,
                records_marked,
            })
        }
        Account::Admin { .. } => {
            return Err(ApiError::Forbidden("Dashboard is for students and lecturers"));
        }
    };

    Ok(Json(response))
}
