use serde::Serialize;

use crate::schemas::academic::CourseResponse;
use crate::schemas::class_session::ClassSessionResponse;
use crate::schemas::user::UserResponse;
use crate::services::attendance_stats::AttendanceSummary;

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub(crate) enum DashboardResponse {
    Student(StudentDashboard),
    Lecturer(LecturerDashboard),
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentDashboard {
    pub(crate) user: UserResponse,
    pub(crate) stats: AttendanceSummary,
    pub(crate) classes: Vec<ClassSessionResponse>,
    pub(crate) courses: Vec<CourseResponse>,
    pub(crate) current_date: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LecturerDashboard {
    pub(crate) user: UserResponse,
    pub(crate) courses: Vec<CourseResponse>,
    pub(crate) class_count: i64,
    pub(crate) records_marked: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminOverview {
    pub(crate) user: UserResponse,
    pub(crate) faculties: i64,
    pub(crate) departments: i64,
    pub(crate) levels: i64,
    pub(crate) semesters: i64,
    pub(crate) courses: i64,
    pub(crate) students: i64,
    pub(crate) lecturers: i64,
}
