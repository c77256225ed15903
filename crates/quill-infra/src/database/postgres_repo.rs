//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{PAGE_SIZE, PostFilter, PostPage, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page(&self, filter: &PostFilter, page: u64) -> Result<PostPage, RepoError> {
        let mut query = PostEntity::find();

        if let Some(username) = &filter.username {
            query = query.filter(post::Column::AuthorName.eq(username));
        }
        if let Some(tag) = &filter.tag {
            query = query.filter(Expr::cust_with_values("? = ANY(tags)", [tag.clone()]));
        }

        // Ties on the timestamp break by id so page boundaries stay stable.
        let paginator = query
            .order_by_desc(post::Column::PublishedAt)
            .order_by_desc(post::Column::Id)
            .paginate(self.db.as_ref(), PAGE_SIZE);

        let last_page = paginator
            .num_pages()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let posts = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(PostPage {
            posts: posts.into_iter().map(Into::into).collect(),
            last_page,
        })
    }

    async fn update(&self, updated: &Post) -> Result<Post, RepoError> {
        let active = post::ActiveModel {
            id: ActiveValue::Unchanged(updated.id),
            title: Set(updated.title.clone()),
            body: Set(updated.body.clone()),
            tags: Set(updated.tags.clone()),
            ..Default::default()
        };

        match active.update(self.db.as_ref()).await {
            Ok(model) => Ok(model.into()),
            Err(DbErr::RecordNotUpdated) => Err(RepoError::NotFound),
            Err(e) => Err(map_db_err(e)),
        }
    }
}
