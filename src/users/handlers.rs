use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::extractors::AuthSession;
use crate::error::AppError;
use crate::state::AppState;
use crate::users::dto::{PublicUser, UpdateUserRequest, UpdatedUserResponse};
use crate::users::repo::{User, UserChanges};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).put(update_user))
}

#[instrument(skip(state, _session))]
pub async fn list_users(
    State(state): State<AppState>,
    _session: AuthSession,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, id).await?;
    Ok(Json(user.into()))
}

/// Self-service profile update; a principal may only edit its own record.
#[instrument(skip(state, session, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> Result<Json<UpdatedUserResponse>, AppError> {
    if session.principal.user_id != id {
        warn!(
            principal = session.principal.user_id,
            target = id,
            "profile update denied"
        );
        return Err(AppError::Forbidden);
    }

    if let Some(email) = payload.email.take() {
        let email = email.trim().to_lowercase();
        if !crate::auth::handlers::is_valid_email(&email) {
            return Err(AppError::Validation("invalid email".into()));
        }
        payload.email = Some(email);
    }
    if matches!(payload.username.as_deref(), Some("")) {
        return Err(AppError::Validation("username must not be empty".into()));
    }
    if matches!(payload.name.as_deref(), Some("")) {
        return Err(AppError::Validation("name must not be empty".into()));
    }

    let user = User::update(
        &state.db,
        id,
        UserChanges {
            username: payload.username,
            name: payload.name,
            email: payload.email,
            favorite_color: payload.favorite_color,
            about_author: payload.about_author,
        },
    )
    .await?;

    info!(user_id = user.id, "user updated");
    Ok(Json(UpdatedUserResponse {
        message: "User updated successfully!".into(),
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::users::repo::NewUser;

    async fn seed(state: &AppState, username: &str, email: &str) -> User {
        User::create(
            &state.db,
            NewUser {
                username: username.into(),
                name: username.into(),
                email: email.into(),
                favorite_color: None,
                about_author: None,
                password_hash: hash_password("hunter2").unwrap(),
            },
        )
        .await
        .unwrap()
    }

    fn session_for(state: &AppState, user_id: i64) -> AuthSession {
        let token = state.sessions.open(user_id);
        AuthSession {
            principal: crate::auth::session::Principal { user_id },
            token,
        }
    }

    #[tokio::test]
    async fn user_can_update_own_profile() {
        let state = AppState::for_tests().await;
        let alice = seed(&state, "alice", "alice@example.com").await;

        let res = update_user(
            State(state.clone()),
            session_for(&state, alice.id),
            Path(alice.id),
            Json(UpdateUserRequest {
                favorite_color: Some("green".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(res.0.user.favorite_color.as_deref(), Some("green"));
    }

    #[tokio::test]
    async fn user_cannot_update_someone_else() {
        let state = AppState::for_tests().await;
        let alice = seed(&state, "alice", "alice@example.com").await;
        let bob = seed(&state, "bob", "bob@example.com").await;

        let err = update_user(
            State(state.clone()),
            session_for(&state, bob.id),
            Path(alice.id),
            Json(UpdateUserRequest {
                name: Some("Mallory".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        // record untouched
        let unchanged = User::find_by_id(&state.db, alice.id).await.unwrap();
        assert_eq!(unchanged.name, "alice");
    }

    #[tokio::test]
    async fn update_rejects_malformed_email() {
        let state = AppState::for_tests().await;
        let alice = seed(&state, "alice", "alice@example.com").await;

        let err = update_user(
            State(state.clone()),
            session_for(&state, alice.id),
            Path(alice.id),
            Json(UpdateUserRequest {
                email: Some("not-an-email".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
