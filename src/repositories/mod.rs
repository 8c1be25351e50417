pub(crate) mod attendance;
pub(crate) mod bootstrap_markers;
pub(crate) mod cascade;
pub(crate) mod class_sessions;
pub(crate) mod courses;
pub(crate) mod departments;
pub(crate) mod enrollments;
pub(crate) mod faculties;
pub(crate) mod health;
pub(crate) mod levels;
pub(crate) mod overview;
pub(crate) mod semesters;
pub(crate) mod sessions;
pub(crate) mod users;
