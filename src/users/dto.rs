use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo::User;

/// Public part of a user returned to clients; never carries the digest.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub favorite_color: Option<String>,
    pub about_author: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            email: u.email,
            favorite_color: u.favorite_color,
            about_author: u.about_author,
            created_at: u.created_at,
        }
    }
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub favorite_color: Option<String>,
    pub about_author: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdatedUserResponse {
    pub message: String,
    pub user: PublicUser,
}
