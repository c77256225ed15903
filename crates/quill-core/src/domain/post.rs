use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author snapshot embedded in every post.
///
/// Captured from the creating identity and immutable for the life of the
/// post. Listing filters match on the embedded username, so no join is
/// needed to answer "posts by alice".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: Uuid,
    pub username: String,
}

/// Post entity - a published blog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author: PostAuthor,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
}

/// Partial update for a post's mutable fields. `None` leaves the field
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.tags.is_none()
    }
}

impl Post {
    /// Create a new post owned by `author`, published now.
    pub fn new(author: PostAuthor, title: String, body: String, tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            title,
            body,
            tags: dedup_tags(tags),
            published_at: Utc::now(),
        }
    }

    /// Apply a partial update. Only the title, body, and tags can change;
    /// the author and publication date are fixed at creation.
    pub fn apply(mut self, patch: PostPatch) -> Self {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(tags) = patch.tags {
            self.tags = dedup_tags(tags);
        }
        self
    }
}

/// Tags form a set: duplicates collapse, first occurrence keeps its slot.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter().filter(|tag| seen.insert(tag.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> PostAuthor {
        PostAuthor {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
        }
    }

    #[test]
    fn test_new_post_dedups_tags() {
        let post = Post::new(
            author(),
            "Title".to_string(),
            "Body".to_string(),
            vec!["rust".to_string(), "web".to_string(), "rust".to_string()],
        );
        assert_eq!(post.tags, vec!["rust".to_string(), "web".to_string()]);
    }

    #[test]
    fn test_apply_changes_only_requested_fields() {
        let post = Post::new(
            author(),
            "Title".to_string(),
            "Body".to_string(),
            vec!["rust".to_string()],
        );
        let id = post.id;
        let author = post.author.clone();
        let published_at = post.published_at;

        let patch = PostPatch {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        let updated = post.apply(patch);

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.body, "Body");
        assert_eq!(updated.tags, vec!["rust".to_string()]);
        assert_eq!(updated.id, id);
        assert_eq!(updated.author, author);
        assert_eq!(updated.published_at, published_at);
    }

    #[test]
    fn test_apply_empty_patch_is_noop() {
        let post = Post::new(author(), "Title".to_string(), "Body".to_string(), vec![]);
        let title = post.title.clone();
        let updated = post.clone().apply(PostPatch::default());
        assert_eq!(updated.title, title);
        assert_eq!(updated.body, post.body);
    }

    #[test]
    fn test_apply_dedups_replacement_tags() {
        let post = Post::new(author(), "Title".to_string(), "Body".to_string(), vec![]);
        let patch = PostPatch {
            tags: Some(vec!["a".to_string(), "b".to_string(), "a".to_string()]),
            ..Default::default()
        };
        assert_eq!(
            post.apply(patch).tags,
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
