//! Identity extractor and the ownership guard.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

use quill_core::domain::Post;
use quill_core::ports::TokenClaims;

use super::error::AppError;

/// Authenticated caller identity, placed in request extensions by the
/// session middleware after cookie verification.
///
/// Use this in handlers to require a login:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
/// Anonymous requests are rejected with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or(AppError::Unauthorized),
        )
    }
}

/// Ownership guard: only the author of `post` may proceed.
///
/// Having a login is not enough to touch someone else's post, so the
/// failure here is 403, not 401.
pub fn require_owner(identity: &Identity, post: &Post) -> Result<(), AppError> {
    if post.author.id != identity.user_id {
        tracing::debug!(
            post_id = %post.id,
            user_id = %identity.user_id,
            "Ownership check failed"
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}
