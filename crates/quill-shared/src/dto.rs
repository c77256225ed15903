//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

/// Request to publish a new post. All three fields are required; an empty
/// `tags` list must still be spelled out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritePostRequest {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Partial update for an existing post. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Query parameters accepted by the post listing.
///
/// `page` stays a string here: the handler owns the parse so that
/// non-numeric input can fall back to the first page while numeric values
/// below one are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub username: Option<String>,
    pub tag: Option<String>,
}

/// Author block embedded in post responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAuthorResponse {
    pub id: String,
    pub username: String,
}

/// A post as returned by the API. List responses carry a previewed `body`;
/// single-post reads carry the full text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author: PostAuthorResponse,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub published_at: String,
}
