use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Course, Department, Faculty, Level, Semester};
use crate::repositories::cascade::CascadeSummary;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct FacultyCreate {
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub(crate) name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LevelCreate {
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 20, message = "name must be 1-20 characters"))]
    pub(crate) name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SemesterCreate {
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub(crate) name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct DepartmentCreate {
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub(crate) name: String,
    #[validate(length(min = 1, message = "faculty_id is required"))]
    pub(crate) faculty_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DepartmentListQuery {
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) faculty_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub(crate) name: String,
    #[validate(length(min = 1, message = "department_id is required"))]
    pub(crate) department_id: String,
    #[validate(length(min = 1, message = "semester_id is required"))]
    pub(crate) semester_id: String,
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) lecturer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseListQuery {
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) semester_id: Option<String>,
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) department_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseLecturerAssign {
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) lecturer_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EnrollmentRequest {
    #[validate(length(min = 1, message = "student_id is required"))]
    pub(crate) student_id: String,
    #[validate(length(min = 1, message = "course_id is required"))]
    pub(crate) course_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LecturerStudentRequest {
    #[validate(length(min = 1, message = "lecturer_id is required"))]
    pub(crate) lecturer_id: String,
    #[validate(length(min = 1, message = "student_id is required"))]
    pub(crate) student_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssociationResponse {
    pub(crate) changed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CascadeDeleteResponse {
    pub(crate) deleted: bool,
    #[serde(flatten)]
    pub(crate) summary: CascadeSummary,
}

#[derive(Debug, Serialize)]
pub(crate) struct FacultyResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) created_at: String,
}

impl From<Faculty> for FacultyResponse {
    fn from(faculty: Faculty) -> Self {
        Self { id: faculty.id, name: faculty.name, created_at: format_primitive(faculty.created_at) }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DepartmentResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) faculty_id: String,
    pub(crate) created_at: String,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id,
            name: department.name,
            faculty_id: department.faculty_id,
            created_at: format_primitive(department.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LevelResponse {
    pub(crate) id: String,
    pub(crate) name: String,
}

impl From<Level> for LevelResponse {
    fn from(level: Level) -> Self {
        Self { id: level.id, name: level.name }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SemesterResponse {
    pub(crate) id: String,
    pub(crate) name: String,
}

impl From<Semester> for SemesterResponse {
    fn from(semester: Semester) -> Self {
        Self { id: semester.id, name: semester.name }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) department_id: String,
    pub(crate) semester_id: String,
    pub(crate) lecturer_id: Option<String>,
    pub(crate) created_at: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            department_id: course.department_id,
            semester_id: course.semester_id,
            lecturer_id: course.lecturer_id,
            created_at: format_primitive(course.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_response_flattens_summary() {
        let response = CascadeDeleteResponse {
            deleted: true,
            summary: CascadeSummary { students_removed: 3, lecturers_removed: 1 },
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json, serde_json::json!({"deleted": true, "students_removed": 3, "lecturers_removed": 1}));
    }

    #[test]
    fn name_limits_follow_each_table() {
        let level: LevelCreate =
            serde_json::from_value(serde_json::json!({"name": "L".repeat(21)})).unwrap();
        let semester: SemesterCreate =
            serde_json::from_value(serde_json::json!({"name": "S".repeat(51)})).unwrap();
        let fitting: LevelCreate = serde_json::from_str(r#"{"name": " HND2 "}"#).unwrap();

        assert!(level.validate().unwrap_err().field_errors().contains_key("name"));
        assert!(semester.validate().unwrap_err().field_errors().contains_key("name"));
        assert!(fitting.validate().is_ok());
    }

    #[test]
    fn blank_names_fail_validation() {
        let faculty: FacultyCreate = serde_json::from_str(r#"{"name": "   "}"#).unwrap();
        let course: CourseCreate = serde_json::from_str(
            r#"{"name": " \t ", "department_id": "d-1", "semester_id": "s-1"}"#,
        )
        .unwrap();

        assert!(faculty.validate().unwrap_err().field_errors().contains_key("name"));
        assert!(course.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn blank_lecturer_unassigns_course() {
        let payload: CourseLecturerAssign = serde_json::from_str(r#"{"lecturer_id": ""}"#).unwrap();
        assert_eq!(payload.lecturer_id, None);
    }
}
