//! In-memory repositories - used as fallback when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, PAGE_SIZE, PostFilter, PostPage, PostRepository, UserRepository,
};

/// In-memory user store using a HashMap with async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' already taken",
                user.username
            )));
        }
        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// In-memory post store.
///
/// Listing sorts a snapshot on every call, which is fine at the scale this
/// fallback is meant for (local development without Postgres).
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(post: &Post, filter: &PostFilter) -> bool {
    let by_user = filter
        .username
        .as_deref()
        .is_none_or(|u| post.author.username == u);
    let by_tag = filter
        .tag
        .as_deref()
        .is_none_or(|t| post.tags.iter().any(|tag| tag == t));
    by_user && by_tag
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.store.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page(&self, filter: &PostFilter, page: u64) -> Result<PostPage, RepoError> {
        let store = self.store.read().await;

        let mut matching: Vec<&Post> = store.values().filter(|p| matches(p, filter)).collect();
        // Same order as the Postgres query: newest first, id as tiebreak.
        matching.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then(b.id.cmp(&a.id))
        });

        let last_page = (matching.len() as u64).div_ceil(PAGE_SIZE);
        let skip = page.saturating_sub(1).saturating_mul(PAGE_SIZE);

        let posts = matching
            .into_iter()
            .skip(skip as usize)
            .take(PAGE_SIZE as usize)
            .cloned()
            .collect();

        Ok(PostPage { posts, last_page })
    }

    async fn update(&self, updated: &Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&updated.id) {
            Some(post) => {
                post.title = updated.title.clone();
                post.body = updated.body.clone();
                post.tags = updated.tags.clone();
                Ok(post.clone())
            }
            None => Err(RepoError::NotFound),
        }
    }
}
