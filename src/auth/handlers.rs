use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::dto::{
    DashboardResponse, LoginRequest, MessageResponse, RegisterRequest, RegisterResponse,
    SessionResponse,
};
use crate::auth::extractors::AuthSession;
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::posts::dto::PostResponse;
use crate::posts::repo::Post;
use crate::state::AppState;
use crate::users::dto::PublicUser;
use crate::users::repo::{NewUser, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/dashboard", get(dashboard))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("invalid email".into()));
    }
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("username is required".into()));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if payload.password.len() < 6 {
        warn!("password too short");
        return Err(AppError::Validation("password too short".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    // Uniqueness of email and username is enforced by the registry; a
    // violation comes back as Duplicate, not as a partial write.
    let user = User::create(
        &state.db,
        NewUser {
            username: payload.username.trim().to_string(),
            name: payload.name.trim().to_string(),
            email: payload.email,
            favorite_color: payload.favorite_color,
            about_author: payload.about_author,
            password_hash,
        },
    )
    .await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully!".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let who = payload.username_or_email.trim();

    let user = match User::find_by_username(&state.db, who).await? {
        Some(u) => Some(u),
        None => User::find_by_email(&state.db, &who.to_lowercase()).await?,
    };

    // Unknown user and wrong password are logged apart but indistinguishable
    // to the caller.
    let user = match user {
        Some(u) => u,
        None => {
            warn!(who, "login unknown user");
            return Err(AppError::Auth);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Auth);
    }

    let token = state.sessions.open(user.id);
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(SessionResponse {
        message: "Login successful!".into(),
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    session: AuthSession,
) -> Json<MessageResponse> {
    state.sessions.close(&session.token);
    info!(user_id = session.principal.user_id, "user logged out");
    Json(MessageResponse {
        message: "You have been logged out!".into(),
    })
}

#[instrument(skip(state, session))]
pub async fn get_me(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, session.principal.user_id).await?;
    Ok(Json(user.into()))
}

/// The principal's profile plus their own posts, newest first.
#[instrument(skip(state, session))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = User::find_by_id(&state.db, session.principal.user_id).await?;
    let posts = Post::list_by_author(&state.db, user.id).await?;
    Ok(Json(DashboardResponse {
        user: user.into(),
        posts: posts.into_iter().map(PostResponse::from).collect(),
    }))
}
