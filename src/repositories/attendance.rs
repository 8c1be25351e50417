use sqlx::{PgPool, Postgres, QueryBuilder};
use time::{Date, PrimitiveDateTime};

use crate::db::models::AttendanceRecord;
use crate::db::types::AttendanceStatus;

const COLUMNS: &str = "id, student_id, course_id, lecturer_id, class_session_id, status, recorded_at";

const HISTORY_SELECT: &str = "SELECT r.id, r.student_id, su.name AS student_name, s.student_number,
        r.course_id, c.name AS course_name, c.semester_id, sm.name AS semester_name,
        r.lecturer_id, lu.name AS lecturer_name, r.class_session_id, cs.title AS class_title,
        r.status, r.recorded_at
 FROM attendance_records r
 JOIN courses c ON c.id = r.course_id
 JOIN semesters sm ON sm.id = c.semester_id
 JOIN students s ON s.user_id = r.student_id
 JOIN users su ON su.id = r.student_id
 JOIN users lu ON lu.id = r.lecturer_id
 LEFT JOIN class_sessions cs ON cs.id = r.class_session_id";

const COUNT_SELECT: &str =
    "SELECT COUNT(*) FROM attendance_records r JOIN courses c ON c.id = r.course_id";

const STATUS_SELECT: &str = "SELECT r.status, COUNT(*) FROM attendance_records r
 JOIN courses c ON c.id = r.course_id";

pub(crate) struct NewAttendance<'a> {
    pub(crate) id: String,
    pub(crate) student_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) lecturer_id: &'a str,
    pub(crate) class_session_id: Option<&'a str>,
    pub(crate) status: AttendanceStatus,
    pub(crate) recorded_at: PrimitiveDateTime,
}

/// Whose records a history query reads.
#[derive(Debug, Clone, Copy)]
pub(crate) enum HistoryScope<'a> {
    Student(&'a str),
    Lecturer(&'a str),
}

/// Optional filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct HistoryFilter {
    pub(crate) semester_id: Option<String>,
    pub(crate) course_id: Option<String>,
    pub(crate) date: Option<Date>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct HistoryRow {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) student_number: String,
    pub(crate) course_id: String,
    pub(crate) course_name: String,
    pub(crate) semester_id: String,
    pub(crate) semester_name: String,
    pub(crate) lecturer_id: String,
    pub(crate) lecturer_name: String,
    pub(crate) class_session_id: Option<String>,
    pub(crate) class_title: Option<String>,
    pub(crate) status: AttendanceStatus,
    pub(crate) recorded_at: PrimitiveDateTime,
}

/// Inserts the batch, skipping rows that collide with an existing record for the
/// same student, course, class and day. Only the written rows are returned.
pub(crate) async fn insert_batch(
    conn: &mut sqlx::PgConnection,
    records: &[NewAttendance<'_>],
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO attendance_records (
            id, student_id, course_id, lecturer_id, class_session_id, status, recorded_at
         ) ",
    );
    builder.push_values(records, |mut row, record| {
        row.push_bind(record.id.clone())
            .push_bind(record.student_id.to_string())
            .push_bind(record.course_id.to_string())
            .push_bind(record.lecturer_id.to_string())
            .push_bind(record.class_session_id.map(str::to_string))
            .push_bind(record.status)
            .push_bind(record.recorded_at);
    });
    builder.push(" ON CONFLICT DO NOTHING RETURNING ");
    builder.push(COLUMNS);

    builder.build_query_as::<AttendanceRecord>().fetch_all(&mut *conn).await
}

fn push_scope_and_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    scope: HistoryScope<'_>,
    filter: &HistoryFilter,
) {
    match scope {
        HistoryScope::Student(student_id) => {
            builder.push(" WHERE r.student_id = ").push_bind(student_id.to_string());
        }
        HistoryScope::Lecturer(lecturer_id) => {
            builder.push(" WHERE r.lecturer_id = ").push_bind(lecturer_id.to_string());
        }
    }
    if let Some(semester_id) = &filter.semester_id {
        builder.push(" AND c.semester_id = ").push_bind(semester_id.clone());
    }
    if let Some(course_id) = &filter.course_id {
        builder.push(" AND r.course_id = ").push_bind(course_id.clone());
    }
    if let Some(date) = filter.date {
        builder.push(" AND r.recorded_on = ").push_bind(date);
    }
}

fn history_query(
    scope: HistoryScope<'_>,
    filter: &HistoryFilter,
    skip: i64,
    limit: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(HISTORY_SELECT);
    push_scope_and_filter(&mut builder, scope, filter);
    builder.push(" ORDER BY r.recorded_at DESC, r.id DESC OFFSET ");
    builder.push_bind(skip);
    builder.push(" LIMIT ");
    builder.push_bind(limit);
    builder
}

pub(crate) async fn history(
    pool: &PgPool,
    scope: HistoryScope<'_>,
    filter: &HistoryFilter,
    skip: i64,
    limit: i64,
) -> Result<Vec<HistoryRow>, sqlx::Error> {
    history_query(scope, filter, skip, limit)
        .build_query_as::<HistoryRow>()
        .fetch_all(pool)
        .await
}

pub(crate) async fn count(
    pool: &PgPool,
    scope: HistoryScope<'_>,
    filter: &HistoryFilter,
) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(COUNT_SELECT);
    push_scope_and_filter(&mut builder, scope, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Per-status totals for the scope, restricted by the filter.
pub(crate) async fn status_counts(
    pool: &PgPool,
    scope: HistoryScope<'_>,
    filter: &HistoryFilter,
) -> Result<Vec<(AttendanceStatus, i64)>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(STATUS_SELECT);
    push_scope_and_filter(&mut builder, scope, filter);
    builder.push(" GROUP BY r.status");
    builder.build_query_as::<(AttendanceStatus, i64)>().fetch_all(pool).await
}
