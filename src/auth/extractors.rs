use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::session::{Principal, SessionStore};
use crate::error::AppError;
use crate::state::AppState;

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

/// Extractor gating a route to authenticated principals.
///
/// Keeps the raw token alongside the principal so logout can close the
/// session it came in on.
pub struct AuthSession {
    pub principal: Principal,
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionStore::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Auth)?;

        let token = auth_header.strip_prefix("Bearer ").ok_or(AppError::Auth)?;

        match sessions.current(token) {
            Some(principal) => Ok(AuthSession {
                principal,
                token: token.to_string(),
            }),
            None => {
                warn!("request with missing or expired session token");
                Err(AppError::Auth)
            }
        }
    }
}
