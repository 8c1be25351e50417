use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::ClassSession;
use crate::schemas::Choice;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ClassSessionCreate {
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 20, message = "course_code must be 1-20 characters"))]
    pub(crate) course_code: String,
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub(crate) title: String,
    #[serde(alias = "time", deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 50, message = "time must be 1-50 characters"))]
    pub(crate) time_label: String,
    #[serde(alias = "department")]
    #[validate(length(min = 1, message = "department_id is required"))]
    pub(crate) department_id: String,
    #[serde(alias = "level")]
    #[validate(length(min = 1, message = "level_id is required"))]
    pub(crate) level_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassSessionResponse {
    pub(crate) id: String,
    pub(crate) course_code: String,
    pub(crate) title: String,
    pub(crate) time: String,
    pub(crate) department_id: String,
    pub(crate) level_id: String,
    pub(crate) lecturer_id: String,
    pub(crate) created_at: String,
}

impl From<ClassSession> for ClassSessionResponse {
    fn from(session: ClassSession) -> Self {
        Self {
            id: session.id,
            course_code: session.course_code,
            title: session.title,
            time: session.time_label,
            department_id: session.department_id,
            level_id: session.level_id,
            lecturer_id: session.lecturer_id,
            created_at: format_primitive(session.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateClassOptions {
    pub(crate) departments: Vec<Choice>,
    pub(crate) levels: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassListQuery {
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_field_names_are_accepted() {
        let payload: ClassSessionCreate = serde_json::from_str(
            r#"{"course_code": "CSC101", "title": "Intro", "time": "Mon 9:00",
                "department": "d-1", "level": "l-1"}"#,
        )
        .unwrap();
        assert_eq!(payload.time_label, "Mon 9:00");
        assert_eq!(payload.department_id, "d-1");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn overlong_course_code_is_rejected() {
        let payload = ClassSessionCreate {
            course_code: "X".repeat(21),
            title: "Intro".to_string(),
            time_label: "Mon".to_string(),
            department_id: "d-1".to_string(),
            level_id: "l-1".to_string(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("course_code"));
    }
}
