use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::FormOrJson;
use crate::api::guards::CurrentLecturer;
use crate::api::pagination::{self, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::class_session::{
    ClassListQuery, ClassSessionCreate, ClassSessionResponse, CreateClassOptions,
};
use crate::schemas::Choice;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/create-class", get(create_class_options).post(create_class))
        .route("/classes", get(list_classes))
}

async fn create_class_options(
    State(state): State<AppState>,
    _lecturer: CurrentLecturer,
) -> Result<Json<CreateClassOptions>, ApiError> {
    let departments = repositories::departments::list(state.db(), None)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list departments"))?;
    let levels = repositories::levels::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list levels"))?;

    Ok(Json(CreateClassOptions {
        departments: departments.into_iter().map(|d| Choice::new(d.id, d.name)).collect(),
        levels: levels.into_iter().map(|l| Choice::new(l.id, l.name)).collect(),
    }))
}

/// Sessions may overlap in time; no conflict check is made.
async fn create_class(
    State(state): State<AppState>,
    lecturer: CurrentLecturer,
    FormOrJson(payload): FormOrJson<ClassSessionCreate>,
) -> Result<(StatusCode, Json<ClassSessionResponse>), ApiError> {
    payload.validate()?;

    let session = repositories::class_sessions::create(
        state.db(),
        repositories::class_sessions::CreateClassSession {
            id: &Uuid::new_v4().to_string(),
            course_code: &payload.course_code,
            title: &payload.title,
            time_label: &payload.time_label,
            department_id: &payload.department_id,
            level_id: &payload.level_id,
            lecturer_id: &lecturer.user.id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Class"))?;

    tracing::info!(
        lecturer_id = %lecturer.user.id,
        lecturer_department_id = %lecturer.profile.department_id,
        class_session_id = %session.id,
        action = "create_class",
        "Class created"
    );

    Ok((StatusCode::CREATED, Json(ClassSessionResponse::from(session))))
}

async fn list_classes(
    State(state): State<AppState>,
    lecturer: CurrentLecturer,
    Query(query): Query<ClassListQuery>,
) -> Result<Json<PaginatedResponse<ClassSessionResponse>>, ApiError> {
    let (skip, limit) = pagination::clamp(query.skip, query.limit);

    let (items, total_count) =
        repositories::class_sessions::list_for_lecturer(state.db(), &lecturer.user.id, skip, limit)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;

    Ok(Json(PaginatedResponse {
        items: items.into_iter().map(ClassSessionResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}
