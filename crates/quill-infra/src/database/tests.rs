#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
    use quill_core::domain::Post;
    use quill_core::error::RepoError;
    use quill_core::ports::{BaseRepository, PostFilter, PostRepository, UserRepository};

    fn post_row(title: &str, author_name: &str, tags: &[&str]) -> post::Model {
        post::Model {
            id: uuid::Uuid::new_v4(),
            author_id: uuid::Uuid::new_v4(),
            author_name: author_name.to_owned(),
            title: title.to_owned(),
            body: "Content".to_owned(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published_at: chrono::Utc::now().into(),
        }
    }

    fn count_row(num_items: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(num_items)))])
    }

    #[tokio::test]
    async fn test_find_post_by_id_maps_author() {
        let row = post_row("Test Post", "alice", &["rust"]);
        let post_id = row.id;
        let author_id = row.author_id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.id, post_id);
        assert_eq!(post.author.id, author_id);
        assert_eq!(post.author.username, "alice");
        assert_eq!(post.tags, vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let user_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                username: "alice".to_owned(),
                password_hash: "hash".to_owned(),
                created_at: chrono::Utc::now().into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user = repo.find_by_username("alice").await.unwrap().unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_find_page_derives_last_page_from_count() {
        // The paginator counts first, then fetches the page.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(12)]])
            .append_query_results(vec![vec![
                post_row("newest", "alice", &[]),
                post_row("older", "alice", &[]),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let page = repo
            .find_page(&PostFilter::new(Some("alice".to_string()), None), 1)
            .await
            .unwrap();

        assert_eq!(page.last_page, 2);
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].title, "newest");
    }

    #[tokio::test]
    async fn test_find_page_no_matches() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(0)]])
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let page = repo.find_page(&PostFilter::default(), 1).await.unwrap();

        assert_eq!(page.last_page, 0);
        assert!(page.posts.is_empty());
    }

    #[tokio::test]
    async fn test_repositories_share_one_connection() {
        let user_id = uuid::Uuid::new_v4();
        let row = post_row("Shared", "alice", &[]);
        let post_id = row.id;

        // One scripted connection answers both repositories in call order.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![user::Model {
                    id: user_id,
                    username: "alice".to_owned(),
                    password_hash: "hash".to_owned(),
                    created_at: chrono::Utc::now().into(),
                }]])
                .append_query_results(vec![vec![row]])
                .into_connection(),
        );

        let users = PostgresUserRepository::new(db.clone());
        let posts = PostgresPostRepository::new(db);

        let user = users.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.id, user_id);

        let post: Post = posts.find_by_id(post_id).await.unwrap().unwrap();
        assert_eq!(post.id, post_id);
    }

    #[tokio::test]
    async fn test_update_returns_the_stored_row() {
        let row = post_row("Edited", "alice", &["a"]);

        // Postgres reports an update via RETURNING.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row.clone()]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let wanted: Post = row.into();

        let stored = repo.update(&wanted).await.unwrap();

        assert_eq!(stored.id, wanted.id);
        assert_eq!(stored.title, "Edited");
    }

    #[tokio::test]
    async fn test_update_vanished_post_is_not_found() {
        // An empty RETURNING result set surfaces as RecordNotUpdated.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let ghost: Post = post_row("ghost", "alice", &[]).into();

        let result = repo.update(&ghost).await;

        assert!(matches!(result.unwrap_err(), RepoError::NotFound));
    }
}
