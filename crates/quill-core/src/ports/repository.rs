use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// Fixed number of posts per listing page.
pub const PAGE_SIZE: u64 = 10;

/// Optional constraints for the post listing. `None` means the dimension is
/// unconstrained; implementations must omit the clause entirely rather than
/// match against an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub username: Option<String>,
    pub tag: Option<String>,
}

impl PostFilter {
    /// Build a filter, dropping empty strings so they do not constrain the
    /// query.
    pub fn new(username: Option<String>, tag: Option<String>) -> Self {
        Self {
            username: username.filter(|u| !u.is_empty()),
            tag: tag.filter(|t| !t.is_empty()),
        }
    }
}

/// One page of listing results plus the derived last page number.
///
/// `last_page` counts pages under the same filter, so clients can stop
/// paginating without a second query. Zero when nothing matches.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub last_page: u64,
}

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository: pagination and partial updates on top of base CRUD.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Fetch one page (1-based) of posts under `filter`, newest first.
    /// Pages past the end come back empty, not as an error.
    async fn find_page(&self, filter: &PostFilter, page: u64) -> Result<PostPage, RepoError>;

    /// Persist the mutable fields (title, body, tags) of an already loaded
    /// post. The author and publication date columns are never written.
    async fn update(&self, post: &Post) -> Result<Post, RepoError>;
}
