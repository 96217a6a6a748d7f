use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::auth::Session;
use crate::error::AppError;
use super::auth::{check_csrf, ACCESS_TOKEN_COOKIE};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, Span};

/// The caller's session if a valid access token is present, otherwise `None`.
/// A valid token on a mutating request still needs its CSRF header.
pub struct MaybeAuthUser(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAuthUser(None));
        };

        let access_token = match cookies.get(ACCESS_TOKEN_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Ok(MaybeAuthUser(None)),
        };

        let claims = match app_state.auth_service.decode_access_token(&access_token) {
            Ok(claims) => claims,
            Err(_) => {
                // expired or forged: treat as guest
                debug!("MaybeAuth: ignoring invalid access token");
                return Ok(MaybeAuthUser(None));
            }
        };
        check_csrf(parts, &claims)?;

        let session = Session::from(claims);
        Span::current().record("user_id", session.id.as_str());

        Ok(MaybeAuthUser(Some(session)))
    }
}
