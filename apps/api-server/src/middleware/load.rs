//! Post resource loader.
//!
//! Resolves the `{id}` path segment into a persisted post before the
//! handler runs: malformed ids are rejected with 400 without touching
//! storage, unknown ids with 404. Handlers receive the loaded post and
//! never look it up twice.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use quill_core::domain::Post;

use super::error::AppError;
use crate::state::AppState;

/// The post addressed by the request path.
pub struct PostById(pub Post);

impl FromRequest for PostById {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = match req.app_data::<web::Data<AppState>>() {
                Some(state) => state.clone(),
                None => {
                    tracing::error!("AppState not found in app data");
                    return Err(AppError::Internal("Server configuration error".to_string()));
                }
            };

            let raw = req.match_info().get("id").unwrap_or_default();
            let id = Uuid::parse_str(raw)
                .map_err(|_| AppError::BadRequest(format!("Malformed post id: {raw}")))?;

            let post = state
                .posts
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

            Ok(PostById(post))
        })
    }
}
