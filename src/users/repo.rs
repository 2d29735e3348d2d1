use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub favorite_color: Option<String>,
    pub about_author: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
    pub favorite_color: Option<String>,
    pub about_author: Option<String>,
    pub password_hash: String,
}

/// Partial self-service update. `None` leaves the column unchanged; the
/// password is deliberately not reachable through this path.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub favorite_color: Option<String>,
    pub about_author: Option<String>,
}

/// Maps a unique-constraint violation to the offending field, everything
/// else to an internal error.
fn map_unique_err(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref dbe) = e {
        if matches!(dbe.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return if dbe.message().contains("users.email") {
                AppError::Duplicate("email")
            } else {
                AppError::Duplicate("username")
            };
        }
    }
    e.into()
}

impl User {
    pub async fn create(db: &SqlitePool, new: NewUser) -> Result<User, AppError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, name, email, favorite_color, about_author, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, name, email, favorite_color, about_author, password_hash, created_at
            "#,
        )
        .bind(new.username)
        .bind(new.name)
        .bind(new.email)
        .bind(new.favorite_color)
        .bind(new.about_author)
        .bind(new.password_hash)
        .bind(now)
        .fetch_one(db)
        .await
        .map_err(map_unique_err)?;
        Ok(user)
    }

    pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, favorite_color, about_author, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, favorite_color, about_author, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, favorite_color, about_author, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("user"))
    }

    pub async fn update(
        db: &SqlitePool,
        id: i64,
        changes: UserChanges,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                favorite_color = COALESCE($5, favorite_color),
                about_author = COALESCE($6, about_author)
            WHERE id = $1
            RETURNING id, username, name, email, favorite_color, about_author, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.favorite_color)
        .bind(changes.about_author)
        .fetch_optional(db)
        .await
        .map_err(map_unique_err)?
        .ok_or(AppError::NotFound("user"))
    }

    pub async fn list_all(db: &SqlitePool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, favorite_color, about_author, password_hash, created_at
            FROM users
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }
}
