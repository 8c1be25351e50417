use serde::Serialize;
use sqlx::PgPool;

use crate::db::types::AttendanceStatus;
use crate::repositories::attendance::{self, HistoryFilter, HistoryScope};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct StatusCounts {
    pub(crate) present: i64,
    pub(crate) absent: i64,
    pub(crate) excused: i64,
}

impl StatusCounts {
    pub(crate) fn from_rows(rows: impl IntoIterator<Item = (AttendanceStatus, i64)>) -> Self {
        rows.into_iter().fold(Self::default(), |mut counts, (status, count)| {
            match status {
                AttendanceStatus::Present => counts.present += count,
                AttendanceStatus::Absent => counts.absent += count,
                AttendanceStatus::Excused => counts.excused += count,
            }
            counts
        })
    }

    pub(crate) fn total(&self) -> i64 {
        self.present + self.absent + self.excused
    }
}

/// A student's standing: what they attended against what was scheduled for
/// their department and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct AttendanceSummary {
    pub(crate) attended: i64,
    pub(crate) missed: i64,
    pub(crate) excused: i64,
    /// Every record on file for the student, whatever its status.
    pub(crate) recorded: i64,
    pub(crate) scheduled: i64,
    pub(crate) percentage: i64,
}

impl AttendanceSummary {
    pub(crate) fn from_counts(counts: StatusCounts, scheduled: i64) -> Self {
        let percentage = if scheduled > 0 { counts.present * 100 / scheduled } else { 0 };
        Self {
            attended: counts.present,
            missed: counts.absent,
            excused: counts.excused,
            recorded: counts.total(),
            scheduled,
            percentage,
        }
    }
}

pub(crate) async fn student_summary(
    pool: &PgPool,
    student_id: &str,
    department_id: &str,
    level_id: &str,
) -> Result<AttendanceSummary, sqlx::Error> {
    let rows =
        attendance::status_counts(pool, HistoryScope::Student(student_id), &HistoryFilter::default())
            .await?;
    let scheduled = crate::repositories::class_sessions::count_for_department_level(
        pool,
        department_id,
        level_id,
    )
    .await?;

    Ok(AttendanceSummary::from_counts(StatusCounts::from_rows(rows), scheduled))
}
