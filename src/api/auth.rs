use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::FormOrJson;
use crate::api::guards::CurrentUser;
use crate::core::config::Settings;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::core::{metrics, security};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::auth::{
    landing_page, LoginRequest, LoginResponse, LogoutResponse, SessionStatusResponse,
};
use crate::schemas::user::UserResponse;

/// Max login attempts per identifier inside one window.
const LOGIN_RATE_LIMIT: u64 = 10;
const LOGIN_RATE_WINDOW_SECONDS: u64 = 60;
const INVALID_CREDENTIALS: &str = "Invalid login credentials";

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/login", get(session_status).post(login)).route("/logout", get(logout))
}

fn session_cookie(settings: &Settings, token: String) -> Cookie<'static> {
    let session = settings.session();
    Cookie::build((session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(session.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(session.ttl())
        .build()
}

fn removal_cookie(settings: &Settings) -> Cookie<'static> {
    Cookie::build((settings.session().cookie_name.clone(), "")).path("/").build()
}

/// A missing or expired session reads as anonymous; lookup failures are errors.
async fn session_status(
    user: Result<CurrentUser, ApiError>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let account = match user {
        Ok(CurrentUser(account)) => Some(account),
        Err(ApiError::Unauthorized(_)) => None,
        Err(err) => return Err(err),
    };

    Ok(Json(SessionStatusResponse {
        authenticated: account.is_some(),
        user: account.as_ref().map(UserResponse::from_account),
    }))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    FormOrJson(payload): FormOrJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    payload.validate()?;
    let identifier = payload.identifier.trim();

    let rate_key = format!("rl:login:{}", identifier.to_lowercase());
    let allowed = state
        .redis()
        .rate_limit(&rate_key, LOGIN_RATE_LIMIT, LOGIN_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        metrics::record_login("rate_limited");
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    let account = repositories::users::find_account_by_login(state.db(), identifier)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to look up account"))?;

    let Some(account) = account else {
        security::verify_decoy_password(&payload.password);
        metrics::record_login("unknown_identifier");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    };

    let verified = security::verify_password(&payload.password, &account.user().hashed_password)
        .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS))?;
    if !verified {
        metrics::record_login("wrong_password");
        tracing::info!(user_id = %account.id(), "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    let now = primitive_now_utc();
    let expires_at = now + state.settings().session().ttl();
    let token = security::generate_session_token();
    let token_hash = security::hash_session_token(&token);

    repositories::sessions::create(
        state.db(),
        repositories::sessions::CreateSession {
            id: &Uuid::new_v4().to_string(),
            token_hash: &token_hash,
            user_id: account.id(),
            created_at: now,
            expires_at,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create session"))?;

    if let Err(err) = repositories::sessions::delete_expired(state.db(), account.id(), now).await {
        tracing::warn!(error = %err, user_id = %account.id(), "Failed to prune expired sessions");
    }
    if let Err(err) = state.redis().clear(&rate_key).await {
        tracing::debug!(error = %err, "Failed to reset login rate limit");
    }

    metrics::record_login("success");
    tracing::info!(
        user_id = %account.id(),
        identifier = %account.login_identifier(),
        role = account.role().as_str(),
        action = "login",
        "User signed in"
    );

    let jar = jar.add(session_cookie(state.settings(), token));
    Ok((
        jar,
        Json(LoginResponse {
            redirect_to: landing_page(account.role()),
            user: UserResponse::from_account(&account),
            expires_at: format_primitive(expires_at),
        }),
    ))
}

async fn logout(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<LogoutResponse>), ApiError> {
    let token = jar
        .get(&state.settings().session().cookie_name)
        .map(|cookie| cookie.value().to_string());
    if let Some(token) = token {
        repositories::sessions::delete_by_token_hash(
            state.db(),
            &security::hash_session_token(&token),
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to end session"))?;
    }

    tracing::info!(user_id = %account.id(), action = "logout", "User signed out");

    let jar = jar.remove(removal_cookie(state.settings()));
    Ok((StatusCode::OK, jar, Json(LogoutResponse { message: "You've been logged out" })))
}
