use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    // Collected but never unique-enforced and never used for lookup.
    pub slug: String,
    pub author_id: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub slug: String,
}

#[derive(Debug, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
}

impl Post {
    /// Ownership is fixed here at creation and never reassigned.
    pub async fn create(db: &SqlitePool, author_id: i64, new: NewPost) -> Result<Post, AppError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, slug, author_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, slug, author_id, created_at
            "#,
        )
        .bind(new.title)
        .bind(new.content)
        .bind(new.slug)
        .bind(author_id)
        .bind(now)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, slug, author_id, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("post"))
    }

    pub async fn list_all(db: &SqlitePool) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, slug, author_id, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(posts)
    }

    /// The derived reverse relation: a user's posts, newest first.
    pub async fn list_by_author(db: &SqlitePool, author_id: i64) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, slug, author_id, created_at
            FROM posts
            WHERE author_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(db)
        .await?;
        Ok(posts)
    }

    pub async fn update(db: &SqlitePool, id: i64, changes: PostChanges) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                slug = COALESCE($4, slug)
            WHERE id = $1
            RETURNING id, title, content, slug, author_id, created_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.slug)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("post"))
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("post"));
        }
        Ok(())
    }

    /// Case-sensitive substring match on content, title ascending.
    /// instr() rather than LIKE: LIKE is case-insensitive for ASCII.
    pub async fn search(db: &SqlitePool, term: &str) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, slug, author_id, created_at
            FROM posts
            WHERE instr(content, $1) > 0
            ORDER BY title ASC, id ASC
            "#,
        )
        .bind(term)
        .fetch_all(db)
        .await?;
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::state::AppState;
    use crate::users::repo::{NewUser, User};

    async fn seed_author(state: &AppState) -> User {
        User::create(
            &state.db,
            NewUser {
                username: "alice".into(),
                name: "Alice".into(),
                email: "alice@example.com".into(),
                favorite_color: None,
                about_author: None,
                password_hash: hash_password("hunter2").unwrap(),
            },
        )
        .await
        .unwrap()
    }

    fn post(title: &str, content: &str) -> NewPost {
        NewPost {
            title: title.into(),
            content: content.into(),
            slug: title.to_lowercase().replace(' ', "-"),
        }
    }

    #[tokio::test]
    async fn create_then_find_roundtrip() {
        let state = AppState::for_tests().await;
        let author = seed_author(&state).await;

        let created = Post::create(&state.db, author.id, post("Hello", "first words"))
            .await
            .unwrap();
        let found = Post::find_by_id(&state.db, created.id).await.unwrap();
        assert_eq!(found.title, "Hello");
        assert_eq!(found.author_id, author.id);
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let state = AppState::for_tests().await;
        let author = seed_author(&state).await;
        Post::create(&state.db, author.id, post("First", "a"))
            .await
            .unwrap();
        Post::create(&state.db, author.id, post("Second", "b"))
            .await
            .unwrap();

        let titles: Vec<_> = Post::list_all(&state.db)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn update_missing_post_is_not_found() {
        let state = AppState::for_tests().await;
        let err = Post::update(&state.db, 42, PostChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("post")));
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let state = AppState::for_tests().await;
        let err = Post::delete(&state.db, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("post")));
    }

    #[tokio::test]
    async fn duplicate_slugs_are_tolerated() {
        let state = AppState::for_tests().await;
        let author = seed_author(&state).await;
        Post::create(&state.db, author.id, post("One", "x"))
            .await
            .unwrap();
        let mut dup = post("Two", "y");
        dup.slug = "one".into();
        // slug uniqueness is intentionally not enforced
        Post::create(&state.db, author.id, dup).await.unwrap();
    }

    #[tokio::test]
    async fn search_is_case_sensitive_and_title_ordered() {
        let state = AppState::for_tests().await;
        let author = seed_author(&state).await;
        Post::create(&state.db, author.id, post("Zebra", "Rust is great"))
            .await
            .unwrap();
        Post::create(&state.db, author.id, post("Apple", "I like Rust a lot"))
            .await
            .unwrap();
        Post::create(&state.db, author.id, post("Misc", "nothing to see"))
            .await
            .unwrap();

        let titles: Vec<_> = Post::search(&state.db, "Rust")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Apple", "Zebra"]);

        // lowercase query does not match the capitalized content
        assert!(Post::search(&state.db, "rust is").await.unwrap().is_empty());
    }
}
