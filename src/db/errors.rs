use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Persistence failures that callers are expected to branch on.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("duplicate key violates {constraint}")]
    DuplicateKey { constraint: String },
    #[error("reference to missing parent via {constraint}")]
    Reference { constraint: String },
    #[error("value too long for its column")]
    ValueTooLong,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl StoreError {
    /// The human name of the unique field behind a `DuplicateKey`.
    pub(crate) fn duplicate_field(&self) -> Option<&'static str> {
        let StoreError::DuplicateKey { constraint } = self else {
            return None;
        };

        let field = match constraint.as_str() {
            "users_email_key" => "email",
            "students_student_number_key" => "student_number",
            "lecturers_staff_number_key" => "staff_number",
            "faculties_name_key"
            | "departments_name_key"
            | "levels_name_key"
            | "semesters_name_key" => "name",
            "student_courses_pkey" | "lecturer_students_pkey" => "association",
            "attendance_records_daily_key" => "attendance",
            _ => "value",
        };
        Some(field)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            let constraint = db_error.constraint().unwrap_or_default().to_string();
            match db_error.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return StoreError::DuplicateKey { constraint },
                Some(FOREIGN_KEY_VIOLATION) => return StoreError::Reference { constraint },
                Some(STRING_DATA_RIGHT_TRUNCATION) => return StoreError::ValueTooLong,
                _ => {}
            }
        }
        StoreError::Database(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_field_names_known_constraints() {
        let email = StoreError::DuplicateKey { constraint: "users_email_key".to_string() };
        let number =
            StoreError::DuplicateKey { constraint: "students_student_number_key".to_string() };
        let other = StoreError::DuplicateKey { constraint: "something_else".to_string() };

        assert_eq!(email.duplicate_field(), Some("email"));
        assert_eq!(number.duplicate_field(), Some("student_number"));
        assert_eq!(other.duplicate_field(), Some("value"));
        assert_eq!(StoreError::NotFound("course").duplicate_field(), None);
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}
