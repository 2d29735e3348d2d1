use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::extractors::AuthSession;
use crate::auth::guard::require_owner;
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{
    CreatePostRequest, MessageResponse, PostMutationResponse, PostResponse, SearchParams,
    UpdatePostRequest,
};
use super::repo::{NewPost, Post, PostChanges};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/search", get(search_posts))
        .route("/posts/:id", get(get_post))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:id", axum::routing::put(update_post).delete(delete_post))
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let posts = Post::list_all(&state.db).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, AppError> {
    let post = Post::find_by_id(&state.db, id).await?;
    Ok(Json(post.into()))
}

#[instrument(skip(state))]
pub async fn search_posts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let posts = Post::search(&state.db, &params.q).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[instrument(skip(state, session, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostMutationResponse>), AppError> {
    for (field, value) in [
        ("title", &payload.title),
        ("content", &payload.content),
        ("slug", &payload.slug),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    let post = Post::create(
        &state.db,
        session.principal.user_id,
        NewPost {
            title: payload.title,
            content: payload.content,
            slug: payload.slug,
        },
    )
    .await?;

    info!(post_id = post.id, author_id = post.author_id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(PostMutationResponse {
            message: "Blog post submitted successfully!".into(),
            post: post.into(),
        }),
    ))
}

#[instrument(skip(state, session, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<PostMutationResponse>, AppError> {
    let post = Post::find_by_id(&state.db, id).await?;
    if let Err(e) = require_owner(session.principal, &post) {
        warn!(
            principal = session.principal.user_id,
            post_id = id,
            "post edit denied"
        );
        return Err(e);
    }

    let post = Post::update(
        &state.db,
        id,
        PostChanges {
            title: payload.title,
            content: payload.content,
            slug: payload.slug,
        },
    )
    .await?;

    info!(post_id = post.id, "post updated");
    Ok(Json(PostMutationResponse {
        message: "Post has been updated!".into(),
        post: post.into(),
    }))
}

#[instrument(skip(state, session))]
pub async fn delete_post(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let post = Post::find_by_id(&state.db, id).await?;
    if let Err(e) = require_owner(session.principal, &post) {
        warn!(
            principal = session.principal.user_id,
            post_id = id,
            "post delete denied"
        );
        return Err(e);
    }

    Post::delete(&state.db, id).await?;
    info!(post_id = id, "post deleted");
    Ok(Json(MessageResponse {
        message: "Blog post was deleted!".into(),
    }))
}
