//! Removal of the user rows behind students and lecturers that a parent delete
//! would otherwise orphan. `ON DELETE CASCADE` drops the variant rows only, so
//! these helpers run first inside the parent's transaction.

use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub(crate) enum CascadeScope<'a> {
    Faculty(&'a str),
    Department(&'a str),
    Level(&'a str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct CascadeSummary {
    pub(crate) students_removed: u64,
    pub(crate) lecturers_removed: u64,
}

impl CascadeScope<'_> {
    fn id(&self) -> &str {
        match self {
            CascadeScope::Faculty(id) | CascadeScope::Department(id) | CascadeScope::Level(id) => {
                id
            }
        }
    }

    fn student_predicate(&self) -> &'static str {
        match self {
            CascadeScope::Faculty(_) => {
                "faculty_id = $1 OR department_id IN (SELECT id FROM departments WHERE faculty_id = $1)"
            }
            CascadeScope::Department(_) => "department_id = $1",
            CascadeScope::Level(_) => "level_id = $1",
        }
    }

    fn lecturer_predicate(&self) -> Option<&'static str> {
        match self {
            CascadeScope::Faculty(_) => Some(
                "faculty_id = $1 OR department_id IN (SELECT id FROM departments WHERE faculty_id = $1)",
            ),
            CascadeScope::Department(_) => Some("department_id = $1"),
            CascadeScope::Level(_) => None,
        }
    }
}

pub(crate) async fn delete_affected_users(
    conn: &mut sqlx::PgConnection,
    scope: CascadeScope<'_>,
) -> Result<CascadeSummary, sqlx::Error> {
    let students = sqlx::query(&format!(
        "DELETE FROM users WHERE id IN (SELECT user_id FROM students WHERE {})",
        scope.student_predicate()
    ))
    .bind(scope.id())
    .execute(&mut *conn)
    .await?;

    let lecturers_removed = match scope.lecturer_predicate() {
        Some(predicate) => sqlx::query(&format!(
            "DELETE FROM users WHERE id IN (SELECT user_id FROM lecturers WHERE {predicate})"
        ))
        .bind(scope.id())
        .execute(&mut *conn)
        .await?
        .rows_affected(),
        None => 0,
    };

    Ok(CascadeSummary { students_removed: students.rows_affected(), lecturers_removed })
}
