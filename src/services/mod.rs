pub(crate) mod attendance_marking;
pub(crate) mod attendance_stats;
