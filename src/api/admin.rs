use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::FormOrJson;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{self, PaginatedResponse};
use crate::core::security::hash_password;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::enrollments::EnrolledStudent;
use crate::repositories::users::{CreateLecturer, CreateStudent, NewIdentity, PersonFilter};
use crate::schemas::academic::{
    AssociationResponse, CascadeDeleteResponse, CourseCreate, CourseLecturerAssign,
    CourseListQuery, CourseResponse, DepartmentCreate, DepartmentListQuery, DepartmentResponse,
    EnrollmentRequest, FacultyCreate, FacultyResponse, LecturerStudentRequest, LevelCreate,
    LevelResponse, SemesterCreate, SemesterResponse,
};
use crate::schemas::dashboard::AdminOverview;
use crate::schemas::user::{
    LecturerCreate, LecturerResponse, PersonListQuery, StudentCreate, StudentResponse,
    UserResponse,
};

#[derive(Debug, Serialize)]
struct DeletedResponse {
    deleted: bool,
}

#[derive(Debug, Serialize)]
struct LecturerStudentsResponse {
    students: Vec<EnrolledStudent>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/faculties", get(list_faculties).post(create_faculty))
        .route("/faculties/:faculty_id", delete(delete_faculty))
        .route("/departments", get(list_departments).post(create_department))
        .route("/departments/:department_id", delete(delete_department))
        .route("/levels", get(list_levels).post(create_level))
        .route("/levels/:level_id", delete(delete_level))
        .route("/semesters", get(list_semesters).post(create_semester))
        .route("/semesters/:semester_id", delete(delete_semester))
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/:course_id", delete(delete_course))
        .route("/courses/:course_id/lecturer", post(assign_lecturer).put(assign_lecturer))
        .route("/students", get(list_students).post(create_student))
        .route("/students/:student_id", delete(delete_student))
        .route("/lecturers", get(list_lecturers).post(create_lecturer))
        .route("/lecturers/:lecturer_id", delete(delete_lecturer))
        .route("/lecturers/:lecturer_id/students", get(lecturer_students))
        .route("/enrollments", post(enroll_student).delete(unenroll_student))
        .route("/lecturer-students", post(attach_lecturer).delete(detach_lecturer))
}

async fn overview(
    State(state): State<AppState>,
    admin: CurrentAdmin,
) -> Result<Json<AdminOverview>, ApiError> {
    let counts = repositories::overview::counts(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count catalog"))?;

    Ok(Json(AdminOverview {
        user: UserResponse::from_account(&admin.into_account()),
        faculties: counts.faculties,
        departments: counts.departments,
        levels: counts.levels,
        semesters: counts.semesters,
        courses: counts.courses,
        students: counts.students,
        lecturers: counts.lecturers,
    }))
}

async fn create_faculty(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<FacultyCreate>,
) -> Result<(StatusCode, Json<FacultyResponse>), ApiError> {
    payload.validate()?;

    let faculty = repositories::faculties::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        &payload.name,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Faculty"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        faculty_id = %faculty.id,
        action = "faculty_create",
        "Faculty created"
    );
    Ok((StatusCode::CREATED, Json(FacultyResponse::from(faculty))))
}

async fn list_faculties(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<Vec<FacultyResponse>>, ApiError> {
    let faculties = repositories::faculties::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list faculties"))?;
    Ok(Json(faculties.into_iter().map(FacultyResponse::from).collect()))
}

/// Removes the faculty together with its departments, courses and the people
/// registered under it.
async fn delete_faculty(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(faculty_id): Path<String>,
) -> Result<Json<CascadeDeleteResponse>, ApiError> {
    let summary = repositories::faculties::delete(state.db(), &faculty_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Faculty"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        faculty_id = %faculty_id,
        students_removed = summary.students_removed,
        lecturers_removed = summary.lecturers_removed,
        action = "faculty_delete",
        "Faculty deleted"
    );
    Ok(Json(CascadeDeleteResponse { deleted: true, summary }))
}

async fn create_department(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<DepartmentCreate>,
) -> Result<(StatusCode, Json<DepartmentResponse>), ApiError> {
    payload.validate()?;

    let department = repositories::departments::create(
        state.db(),
        repositories::departments::CreateDepartment {
            id: &Uuid::new_v4().to_string(),
            name: &payload.name,
            faculty_id: &payload.faculty_id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Department"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        department_id = %department.id,
        faculty_id = %department.faculty_id,
        action = "department_create",
        "Department created"
    );
    Ok((StatusCode::CREATED, Json(DepartmentResponse::from(department))))
}

async fn list_departments(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(query): Query<DepartmentListQuery>,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    let departments = repositories::departments::list(state.db(), query.faculty_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list departments"))?;
    Ok(Json(departments.into_iter().map(DepartmentResponse::from).collect()))
}

async fn delete_department(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(department_id): Path<String>,
) -> Result<Json<CascadeDeleteResponse>, ApiError> {
    let summary = repositories::departments::delete(state.db(), &department_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Department"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        department_id = %department_id,
        students_removed = summary.students_removed,
        lecturers_removed = summary.lecturers_removed,
        action = "department_delete",
        "Department deleted"
    );
    Ok(Json(CascadeDeleteResponse { deleted: true, summary }))
}

async fn create_level(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<LevelCreate>,
) -> Result<(StatusCode, Json<LevelResponse>), ApiError> {
    payload.validate()?;

    let level = repositories::levels::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        &payload.name,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Level"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        level_id = %level.id,
        action = "level_create",
        "Level created"
    );
    Ok((StatusCode::CREATED, Json(LevelResponse::from(level))))
}

async fn list_levels(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<Vec<LevelResponse>>, ApiError> {
    let levels = repositories::levels::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list levels"))?;
    Ok(Json(levels.into_iter().map(LevelResponse::from).collect()))
}

async fn delete_level(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(level_id): Path<String>,
) -> Result<Json<CascadeDeleteResponse>, ApiError> {
    let summary = repositories::levels::delete(state.db(), &level_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Level"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        level_id = %level_id,
        students_removed = summary.students_removed,
        action = "level_delete",
        "Level deleted"
    );
    Ok(Json(CascadeDeleteResponse { deleted: true, summary }))
}

async fn create_semester(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<SemesterCreate>,
) -> Result<(StatusCode, Json<SemesterResponse>), ApiError> {
    payload.validate()?;

    let semester = repositories::semesters::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        &payload.name,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Semester"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        semester_id = %semester.id,
        action = "semester_create",
        "Semester created"
    );
    Ok((StatusCode::CREATED, Json(SemesterResponse::from(semester))))
}

async fn list_semesters(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<Vec<SemesterResponse>>, ApiError> {
    let semesters = repositories::semesters::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list semesters"))?;
    Ok(Json(semesters.into_iter().map(SemesterResponse::from).collect()))
}

async fn delete_semester(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(semester_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    repositories::semesters::delete(state.db(), &semester_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Semester"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        semester_id = %semester_id,
        action = "semester_delete",
        "Semester deleted"
    );
    Ok(Json(DeletedResponse { deleted: true }))
}

async fn create_course(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate()?;

    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            name: &payload.name,
            department_id: &payload.department_id,
            semester_id: &payload.semester_id,
            lecturer_id: payload.lecturer_id.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Course"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        course_id = %course.id,
        lecturer_id = ?course.lecturer_id,
        action = "course_create",
        "Course created"
    );
    Ok((StatusCode::CREATED, Json(CourseResponse::from(course))))
}

async fn list_courses(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list(
        state.db(),
        query.semester_id.as_deref(),
        query.department_id.as_deref(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// Sets or clears the course's lecturer. An empty `lecturer_id` clears it.
async fn assign_lecturer(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(course_id): Path<String>,
    FormOrJson(payload): FormOrJson<CourseLecturerAssign>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = repositories::courses::assign_lecturer(
        state.db(),
        &course_id,
        payload.lecturer_id.as_deref(),
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Course"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        course_id = %course.id,
        lecturer_id = ?course.lecturer_id,
        action = "course_assign_lecturer",
        "Course lecturer assigned"
    );
    Ok(Json(CourseResponse::from(course)))
}

async fn delete_course(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(course_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    repositories::courses::delete(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Course"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        course_id = %course_id,
        action = "course_delete",
        "Course deleted"
    );
    Ok(Json(DeletedResponse { deleted: true }))
}

fn hashed(password: &str) -> Result<String, ApiError> {
    hash_password(password).map_err(|e| ApiError::internal(e, "Failed to hash password"))
}

async fn create_student(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<StudentCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate()?;

    let email = payload.email.to_lowercase();
    let account = repositories::users::create_student(
        state.db(),
        CreateStudent {
            identity: NewIdentity {
                id: &Uuid::new_v4().to_string(),
                email: &email,
                hashed_password: hashed(&payload.password)?,
                name: &payload.name,
                created_at: primitive_now_utc(),
            },
            student_number: &payload.student_number,
            department_id: &payload.department_id,
            level_id: &payload.level_id,
            initial_course_id: payload.course_id.as_deref(),
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Student"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        student_id = %account.id(),
        action = "student_create",
        "Student created"
    );
    Ok((StatusCode::CREATED, Json(UserResponse::from_account(&account))))
}

async fn list_students(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(query): Query<PersonListQuery>,
) -> Result<Json<PaginatedResponse<StudentResponse>>, ApiError> {
    let (skip, limit) = pagination::clamp(query.skip, query.limit);
    let filter = PersonFilter {
        department_id: query.department_id.as_deref(),
        level_id: query.level_id.as_deref(),
    };

    let (rows, total_count) = repositories::users::list_students(state.db(), &filter, skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(PaginatedResponse {
        items: rows.into_iter().map(StudentResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}

async fn delete_student(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(student_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = repositories::users::delete(state.db(), &student_id, UserRole::Student)
        .await
        .map_err(|e| ApiError::from_store(e, "Student"))?;
    if !deleted {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    tracing::info!(
        admin_id = %admin.user.id,
        student_id = %student_id,
        action = "student_delete",
        "Student deleted"
    );
    Ok(Json(DeletedResponse { deleted }))
}

async fn create_lecturer(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<LecturerCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate()?;

    let email = payload.email.to_lowercase();
    let account = repositories::users::create_lecturer(
        state.db(),
        CreateLecturer {
            identity: NewIdentity {
                id: &Uuid::new_v4().to_string(),
                email: &email,
                hashed_password: hashed(&payload.password)?,
                name: &payload.name,
                created_at: primitive_now_utc(),
            },
            staff_number: &payload.staff_number,
            department_id: &payload.department_id,
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Lecturer"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        lecturer_id = %account.id(),
        action = "lecturer_create",
        "Lecturer created"
    );
    Ok((StatusCode::CREATED, Json(UserResponse::from_account(&account))))
}

async fn list_lecturers(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(query): Query<PersonListQuery>,
) -> Result<Json<PaginatedResponse<LecturerResponse>>, ApiError> {
    let (skip, limit) = pagination::clamp(query.skip, query.limit);

    let (rows, total_count) = repositories::users::list_lecturers(
        state.db(),
        query.department_id.as_deref(),
        skip,
        limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list lecturers"))?;

    Ok(Json(PaginatedResponse {
        items: rows.into_iter().map(LecturerResponse::from).collect(),
        total_count,
        skip,
        limit,
    }))
}

async fn delete_lecturer(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(lecturer_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = repositories::users::delete(state.db(), &lecturer_id, UserRole::Lecturer)
        .await
        .map_err(|e| ApiError::from_store(e, "Lecturer"))?;
    if !deleted {
        return Err(ApiError::NotFound("Lecturer not found".to_string()));
    }

    tracing::info!(
        admin_id = %admin.user.id,
        lecturer_id = %lecturer_id,
        action = "lecturer_delete",
        "Lecturer deleted"
    );
    Ok(Json(DeletedResponse { deleted }))
}

async fn lecturer_students(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(lecturer_id): Path<String>,
) -> Result<Json<LecturerStudentsResponse>, ApiError> {
    let students = repositories::enrollments::list_lecturer_students(state.db(), &lecturer_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list lecturer students"))?;
    Ok(Json(LecturerStudentsResponse { students }))
}

async fn enroll_student(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<EnrollmentRequest>,
) -> Result<Json<AssociationResponse>, ApiError> {
    payload.validate()?;

    let changed = repositories::enrollments::enroll(
        state.db(),
        &payload.student_id,
        &payload.course_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Enrollment"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        student_id = %payload.student_id,
        course_id = %payload.course_id,
        changed,
        action = "enrollment_create",
        "Student enrolled"
    );
    Ok(Json(AssociationResponse { changed }))
}

async fn unenroll_student(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<EnrollmentRequest>,
) -> Result<Json<AssociationResponse>, ApiError> {
    payload.validate()?;

    let changed =
        repositories::enrollments::unenroll(state.db(), &payload.student_id, &payload.course_id)
            .await
            .map_err(|e| ApiError::from_store(e, "Enrollment"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        student_id = %payload.student_id,
        course_id = %payload.course_id,
        changed,
        action = "enrollment_delete",
        "Student unenrolled"
    );
    Ok(Json(AssociationResponse { changed }))
}

async fn attach_lecturer(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<LecturerStudentRequest>,
) -> Result<Json<AssociationResponse>, ApiError> {
    payload.validate()?;

    let changed = repositories::enrollments::attach_lecturer(
        state.db(),
        &payload.lecturer_id,
        &payload.student_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Lecturer assignment"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        lecturer_id = %payload.lecturer_id,
        student_id = %payload.student_id,
        changed,
        action = "lecturer_student_attach",
        "Student attached to lecturer"
    );
    Ok(Json(AssociationResponse { changed }))
}

async fn detach_lecturer(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    FormOrJson(payload): FormOrJson<LecturerStudentRequest>,
) -> Result<Json<AssociationResponse>, ApiError> {
    payload.validate()?;

    let changed = repositories::enrollments::detach_lecturer(
        state.db(),
        &payload.lecturer_id,
        &payload.student_id,
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Lecturer assignment"))?;

    tracing::info!(
        admin_id = %admin.user.id,
        lecturer_id = %payload.lecturer_id,
        student_id = %payload.student_id,
        changed,
        action = "lecturer_student_detach",
        "Student detached from lecturer"
    );
    Ok(Json(AssociationResponse { changed }))
}

#[cfg(test)]
mod tests;
