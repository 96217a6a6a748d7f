use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, Method},
};
use crate::state::AppState;
use crate::domain::models::auth::{Claims, Session};
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{warn, Span};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// A logged-in user, customer or admin.
pub struct AuthUser(pub Session);

/// A logged-in admin. Everyone else gets `FORBIDDEN`.
pub struct AdminUser(pub Session);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(AppError::InternalWithMsg("CookieManagerLayer missing".into()))?;

        let access_token = cookies.get(ACCESS_TOKEN_COOKIE)
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let claims = app_state.auth_service.decode_access_token(&access_token)?;
        check_csrf(parts, &claims)?;

        let session = Session::from(claims);
        Span::current().record("user_id", session.id.as_str());

        Ok(AuthUser(session))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(session) = AuthUser::from_request_parts(parts, state).await?;
        if !session.is_admin() {
            warn!(user_id = %session.id, "Admin route refused");
            return Err(AppError::Forbidden("Administrator access required".into()));
        }
        Ok(AdminUser(session))
    }
}

/// Mutating requests must echo the CSRF token bound into the access token.
pub(crate) fn check_csrf(parts: &Parts, claims: &Claims) -> Result<(), AppError> {
    if matches!(parts.method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(());
    }

    let header = parts.headers.get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Forbidden("Missing CSRF token".into()))?;

    if header != claims.csrf_token {
        return Err(AppError::Forbidden("Invalid CSRF token".into()));
    }
    Ok(())
}
