use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::types::UserRole;
use crate::schemas::user::UserResponse;

/// Students sign in with their student number, lecturers with their staff
/// number and admins with their email. All three arrive in `identifier`.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginRequest {
    #[serde(alias = "matric_number", alias = "student_number", alias = "staff_number")]
    #[serde(alias = "email", alias = "username")]
    #[validate(length(min = 1, max = 120, message = "identifier must not be empty"))]
    pub(crate) identifier: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    pub(crate) user: UserResponse,
    pub(crate) redirect_to: &'static str,
    pub(crate) expires_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionStatusResponse {
    pub(crate) authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) user: Option<UserResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogoutResponse {
    pub(crate) message: &'static str,
}

pub(crate) fn landing_page(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin/overview",
        UserRole::Lecturer | UserRole::Student => "/dashboard",
    }
}
