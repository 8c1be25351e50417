use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{AdminLevel, AttendanceStatus, UserRole};

/// Identity shared by every account variant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) name: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentProfile {
    pub(crate) user_id: String,
    pub(crate) student_number: String,
    pub(crate) department_id: String,
    pub(crate) faculty_id: String,
    pub(crate) level_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct LecturerProfile {
    pub(crate) user_id: String,
    pub(crate) staff_number: String,
    pub(crate) department_id: String,
    pub(crate) faculty_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AdminProfile {
    pub(crate) user_id: String,
    pub(crate) admin_level: AdminLevel,
}

/// A user together with the fields of its role. The variant always agrees with `user.role`.
#[derive(Debug, Clone)]
pub(crate) enum Account {
    Student { user: User, profile: StudentProfile },
    Lecturer { user: User, profile: LecturerProfile },
    Admin { user: User, profile: AdminProfile },
}

impl Account {
    pub(crate) fn user(&self) -> &User {
        match self {
            Account::Student { user, .. }
            | Account::Lecturer { user, .. }
            | Account::Admin { user, .. } => user,
        }
    }

    pub(crate) fn id(&self) -> &str {
        &self.user().id
    }

    pub(crate) fn role(&self) -> UserRole {
        match self {
            Account::Student { .. } => UserRole::Student,
            Account::Lecturer { .. } => UserRole::Lecturer,
            Account::Admin { .. } => UserRole::Admin,
        }
    }

    /// Student or staff number; admins sign in with their email.
    pub(crate) fn login_identifier(&self) -> &str {
        match self {
            Account::Student { profile, .. } => &profile.student_number,
            Account::Lecturer { profile, .. } => &profile.staff_number,
            Account::Admin { user, .. } => &user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Faculty {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Department {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) faculty_id: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Level {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Semester {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) department_id: String,
    pub(crate) semester_id: String,
    pub(crate) lecturer_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ClassSession {
    pub(crate) id: String,
    pub(crate) course_code: String,
    pub(crate) title: String,
    pub(crate) time_label: String,
    pub(crate) department_id: String,
    pub(crate) level_id: String,
    pub(crate) lecturer_id: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AttendanceRecord {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) lecturer_id: String,
    pub(crate) class_session_id: Option<String>,
    pub(crate) status: AttendanceStatus,
    pub(crate) recorded_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct UserSession {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) expires_at: PrimitiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn user(role: UserRole) -> User {
        let now = primitive_now_utc();
        User {
            id: "u-1".to_string(),
            email: "someone@example.com".to_string(),
            hashed_password: String::new(),
            name: "Someone".to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn account_role_follows_variant() {
        let student = Account::Student {
            user: user(UserRole::Student),
            profile: StudentProfile {
                user_id: "u-1".to_string(),
                student_number: "ST-001".to_string(),
                department_id: "d-1".to_string(),
                faculty_id: "f-1".to_string(),
                level_id: "l-1".to_string(),
            },
        };
        let admin = Account::Admin {
            user: user(UserRole::Admin),
            profile: AdminProfile { user_id: "u-1".to_string(), admin_level: AdminLevel::Super },
        };

        assert_eq!(student.role(), UserRole::Student);
        assert_eq!(student.login_identifier(), "ST-001");
        assert_eq!(admin.role(), UserRole::Admin);
        assert_eq!(admin.login_identifier(), "someone@example.com");
    }

    #[test]
    fn lecturer_identifier_is_staff_number() {
        let lecturer = Account::Lecturer {
            user: user(UserRole::Lecturer),
            profile: LecturerProfile {
                user_id: "u-1".to_string(),
                staff_number: "SN-42".to_string(),
                department_id: "d-2".to_string(),
                faculty_id: "f-1".to_string(),
            },
        };

        assert_eq!(lecturer.id(), "u-1");
        assert_eq!(lecturer.login_identifier(), "SN-42");
    }
}
