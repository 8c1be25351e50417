use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Account;
use crate::db::types::{AdminLevel, UserRole};
use crate::repositories::users::{LecturerRow, StudentRow};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentCreate {
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub(crate) name: String,
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(
        email(message = "email must be a valid address"),
        length(max = 120, message = "email must be at most 120 characters")
    )]
    pub(crate) email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub(crate) password: String,
    #[serde(alias = "matric_number", deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 50, message = "student_number must be 1-50 characters"))]
    pub(crate) student_number: String,
    #[validate(length(min = 1, message = "department_id is required"))]
    pub(crate) department_id: String,
    #[validate(length(min = 1, message = "level_id is required"))]
    pub(crate) level_id: String,
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) course_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LecturerCreate {
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub(crate) name: String,
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(
        email(message = "email must be a valid address"),
        length(max = 120, message = "email must be at most 120 characters")
    )]
    pub(crate) email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub(crate) password: String,
    #[serde(deserialize_with = "crate::schemas::trimmed")]
    #[validate(length(min = 1, max = 50, message = "staff_number must be 1-50 characters"))]
    pub(crate) staff_number: String,
    #[validate(length(min = 1, message = "department_id is required"))]
    pub(crate) department_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PersonListQuery {
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) department_id: Option<String>,
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) level_id: Option<String>,
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
}

/// The signed-in account as clients see it. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) student_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) staff_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) level_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) admin_level: Option<AdminLevel>,
}

impl UserResponse {
    pub(crate) fn from_account(account: &Account) -> Self {
        let user = account.user();
        let mut response = Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: account.role(),
            created_at: format_primitive(user.created_at),
            student_number: None,
            staff_number: None,
            department_id: None,
            faculty_id: None,
            level_id: None,
            admin_level: None,
        };

        match account {
            Account::Student { profile, .. } => {
                response.student_number = Some(profile.student_number.clone());
                response.department_id = Some(profile.department_id.clone());
                response.faculty_id = Some(profile.faculty_id.clone());
                response.level_id = Some(profile.level_id.clone());
            }
            Account::Lecturer { profile, .. } => {
                response.staff_number = Some(profile.staff_number.clone());
                response.department_id = Some(profile.department_id.clone());
                response.faculty_id = Some(profile.faculty_id.clone());
            }
            Account::Admin { profile, .. } => {
                response.admin_level = Some(profile.admin_level);
            }
        }
        response
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) student_number: String,
    pub(crate) department_id: String,
    pub(crate) faculty_id: String,
    pub(crate) level_id: String,
}

impl From<StudentRow> for StudentResponse {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            student_number: row.student_number,
            department_id: row.department_id,
            faculty_id: row.faculty_id,
            level_id: row.level_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LecturerResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) staff_number: String,
    pub(crate) department_id: String,
    pub(crate) faculty_id: String,
}

impl From<LecturerRow> for LecturerResponse {
    fn from(row: LecturerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            staff_number: row.staff_number,
            department_id: row.department_id,
            faculty_id: row.faculty_id,
        }
    }
}
