use crate::auth::session::Principal;
use crate::error::AppError;
use crate::posts::repo::Post;

/// Only the owning principal may edit or delete a post.
pub fn require_owner(principal: Principal, post: &Post) -> Result<(), AppError> {
    if principal.user_id == post.author_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn post_owned_by(author_id: i64) -> Post {
        Post {
            id: 1,
            title: "First post".into(),
            content: "hello".into(),
            slug: "first-post".into(),
            author_id,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_is_allowed() {
        let post = post_owned_by(3);
        assert!(require_owner(Principal { user_id: 3 }, &post).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let post = post_owned_by(3);
        for other in [1, 2, 4, 100] {
            let err = require_owner(Principal { user_id: other }, &post).unwrap_err();
            assert!(matches!(err, AppError::Forbidden));
        }
    }
}
