use axum::{extract::State, response::IntoResponse};
use crate::api::dtos::{
    requests::{LoginRequest, RegisterRequest},
    responses::{done, ok},
};
use crate::api::extractors::{auth::{AuthUser, ACCESS_TOKEN_COOKIE}, json::AppJson};
use crate::domain::models::auth::{AuthResponse, IssuedTokens, Session};
use crate::domain::services::auth_service::{ACCESS_TOKEN_MINUTES, REFRESH_TOKEN_DAYS};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.register(&payload.phone, &payload.username, &payload.password).await?;
    Ok(ok("Registration successful", Session::from(&user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (session, tokens) = state.auth_service.login(&payload.username, &payload.password).await?;
    Ok(ok(format!("Welcome back, {}", session.username), respond_with_tokens(&cookies, session, tokens)))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let raw_token = cookies.get(REFRESH_TOKEN_COOKIE)
        .ok_or(AppError::Unauthorized)?
        .value()
        .to_string();

    let (session, tokens) = state.auth_service.refresh(&raw_token).await?;
    info!("Token refreshed for user: {}", session.id);

    Ok(ok("Session refreshed", respond_with_tokens(&cookies, session, tokens)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get(REFRESH_TOKEN_COOKIE) {
        // cookies are cleared either way
        if let Err(e) = state.auth_service.logout(cookie.value()).await {
            warn!("Failed to revoke refresh token on logout: {}", e);
        }
    }

    cookies.remove(Cookie::build((ACCESS_TOKEN_COOKIE, "")).path("/").into());
    cookies.remove(Cookie::build((REFRESH_TOKEN_COOKIE, "")).path("/api/v1/auth").into());

    info!("User logged out");
    Ok(done("Logged out"))
}

pub async fn me(AuthUser(session): AuthUser) -> Result<impl IntoResponse, AppError> {
    Ok(ok("Current user", session))
}

fn respond_with_tokens(cookies: &Cookies, session: Session, tokens: IssuedTokens) -> AuthResponse {
    set_cookies(cookies, &tokens.access_token, &tokens.refresh_token);
    AuthResponse {
        csrf_token: tokens.csrf_token,
        user: session,
    }
}

fn set_cookies(cookies: &Cookies, access: &str, refresh: &str) {
    let mut access_c = Cookie::new(ACCESS_TOKEN_COOKIE, access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(ACCESS_TOKEN_MINUTES));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new(REFRESH_TOKEN_COOKIE, refresh.to_string());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/api/v1/auth");
    refresh_c.set_max_age(Duration::days(REFRESH_TOKEN_DAYS));
    cookies.add(refresh_c);
}
