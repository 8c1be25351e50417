use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use crate::api::errors::ApiError;
use crate::core::time::primitive_now_utc;
use crate::core::{security, state::AppState};
use crate::db::models::{Account, AdminProfile, LecturerProfile, User};
use crate::repositories;

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Any signed-in account. The role comes from the stored user row on every
/// request; nothing about the role is kept in the session.
pub(crate) struct CurrentUser(pub(crate) Account);

pub(crate) struct CurrentLecturer {
    pub(crate) user: User,
    pub(crate) profile: LecturerProfile,
}

pub(crate) struct CurrentAdmin {
    pub(crate) user: User,
    pub(crate) profile: AdminProfile,
}

pub(crate) fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let token = session_token(parts, &app_state.settings().session().cookie_name)
            .ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))?;

        let session = repositories::sessions::find_active_by_token_hash(
            app_state.db(),
            &security::hash_session_token(&token),
            primitive_now_utc(),
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load session"))?
        .ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))?;

        let account = repositories::users::find_account(app_state.db(), &session.user_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?
            .ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))?;

        Ok(CurrentUser(account))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentLecturer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await?.0 {
            Account::Lecturer { user, profile } => Ok(CurrentLecturer { user, profile }),
            _ => Err(ApiError::Forbidden("Lecturer access required")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await?.0 {
            Account::Admin { user, profile } => Ok(CurrentAdmin { user, profile }),
            _ => Err(ApiError::Forbidden("Admin access required")),
        }
    }
}

impl CurrentAdmin {
    pub(crate) fn into_account(self) -> Account {
        Account::Admin { user: self.user, profile: self.profile }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};

    fn parts_with_cookie(cookie: &str) -> Parts {
        let (parts, _) =
            Request::builder().header(header::COOKIE, cookie).body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn session_token_reads_named_cookie() {
        let parts = parts_with_cookie("theme=dark; attendance_session=abc123");
        assert_eq!(session_token(&parts, "attendance_session").as_deref(), Some("abc123"));
        assert_eq!(session_token(&parts, "other"), None);
    }

    #[test]
    fn empty_session_cookie_is_ignored() {
        let parts = parts_with_cookie("attendance_session=");
        assert_eq!(session_token(&parts, "attendance_session"), None);
    }
}
