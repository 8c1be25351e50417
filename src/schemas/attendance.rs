use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::api::pagination::PaginatedResponse;
use crate::core::time::{format_calendar_date, format_primitive};
use crate::db::models::AttendanceRecord;
use crate::db::types::AttendanceStatus;
use crate::repositories::attendance::HistoryRow;
use crate::schemas::Choice;
use crate::services::attendance_stats::StatusCounts;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MarkAttendanceRequest {
    #[validate(length(min = 1, message = "course_id is required"))]
    pub(crate) course_id: String,
    #[serde(deserialize_with = "deserialize_id_list")]
    #[validate(length(min = 1, message = "select at least one student"))]
    pub(crate) student_ids: Vec<String>,
    pub(crate) status: AttendanceStatus,
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) class_session_id: Option<String>,
}

/// Accepts a JSON array of ids or a comma-separated string, the shape a form
/// submission takes.
fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdList;

    impl<'de> Visitor<'de> for IdList {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a list of ids or a comma-separated string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut ids = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(id) = seq.next_element::<String>()? {
                ids.push(id);
            }
            Ok(ids)
        }
    }

    deserializer.deserialize_any(IdList)
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendanceRecordResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) lecturer_id: String,
    pub(crate) class_session_id: Option<String>,
    pub(crate) status: AttendanceStatus,
    pub(crate) recorded_at: String,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            course_id: record.course_id,
            lecturer_id: record.lecturer_id,
            class_session_id: record.class_session_id,
            status: record.status,
            recorded_at: format_primitive(record.recorded_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkAttendanceResponse {
    pub(crate) message: String,
    pub(crate) created: usize,
    pub(crate) skipped: Vec<String>,
    pub(crate) records: Vec<AttendanceRecordResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusChoice {
    pub(crate) value: AttendanceStatus,
    pub(crate) label: &'static str,
}

impl StatusChoice {
    pub(crate) fn all() -> Vec<Self> {
        AttendanceStatus::ALL
            .into_iter()
            .map(|status| Self { value: status, label: status.label() })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkAttendanceOptions {
    pub(crate) courses: Vec<Choice>,
    pub(crate) statuses: Vec<StatusChoice>,
    pub(crate) selected_course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarkAttendanceOptionsQuery {
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    #[serde(default, alias = "semester", deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) semester_id: Option<String>,
    #[serde(default, alias = "course", deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) course_id: Option<String>,
    #[serde(default, deserialize_with = "crate::schemas::empty_as_none")]
    pub(crate) date: Option<String>,
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct HistoryItem {
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
    pub(crate) recorded_at: String,
    pub(crate) date: String,
}

impl From<HistoryRow> for HistoryItem {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            student_name: row.student_name,
            student_number: row.student_number,
            course_id: row.course_id,
            course_name: row.course_name,
            semester_id: row.semester_id,
            semester_name: row.semester_name,
            lecturer_id: row.lecturer_id,
            lecturer_name: row.lecturer_name,
            class_session_id: row.class_session_id,
            class_title: row.class_title,
            status: row.status,
            date: format_calendar_date(row.recorded_at.date()),
            recorded_at: format_primitive(row.recorded_at),
        }
    }
}

/// One page of history plus the status totals over every record the filter matches.
#[derive(Debug, Serialize)]
pub(crate) struct AttendanceHistoryResponse {
    #[serde(flatten)]
    pub(crate) page: PaginatedResponse<HistoryItem>,
    pub(crate) counts: StatusCounts,
    pub(crate) semesters: Vec<Choice>,
    pub(crate) courses: Vec<Choice>,
}
