pub(crate) mod admin;
pub(crate) mod attendance;
pub(crate) mod auth;
pub(crate) mod classes;
pub(crate) mod dashboard;
pub(crate) mod errors;
pub(crate) mod extract;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod pagination;
pub(crate) mod router;
pub(crate) mod students;
