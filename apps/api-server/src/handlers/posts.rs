//! Post handlers: write, list, read, update, remove.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Post, PostAuthor, PostPatch};
use quill_core::ports::PostFilter;
use quill_shared::dto::{
    ListPostsQuery, PostAuthorResponse, PostResponse, UpdatePostRequest, WritePostRequest,
};

use crate::middleware::auth::{Identity, require_owner};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::load::PostById;
use crate::state::AppState;

/// Listing responses cut the body down to this many characters.
const PREVIEW_CHARS: usize = 200;

/// Response header carrying the number of the last page under the current
/// filter.
const LAST_PAGE_HEADER: &str = "Last-Page";

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()));
    }
    Ok(())
}

fn validate_body(body: &str) -> Result<(), AppError> {
    if body.trim().is_empty() {
        return Err(AppError::BadRequest("Body must not be empty".to_string()));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), AppError> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "Tags must not be empty strings".to_string(),
        ));
    }
    Ok(())
}

/// Parse the `page` query parameter.
///
/// Absent, empty, or non-numeric input falls back to the first page, but a
/// number below one is rejected before any storage access. The asymmetry is
/// deliberate: `?page=banana` is treated as noise, `?page=0` is a claim
/// about a page that cannot exist.
fn parse_page(raw: Option<&str>) -> Result<u64, AppError> {
    match raw {
        None | Some("") => Ok(1),
        Some(raw) => match raw.parse::<i64>() {
            Ok(page) if page >= 1 => Ok(page as u64),
            Ok(page) => Err(AppError::BadRequest(format!("Invalid page number: {page}"))),
            Err(_) => Ok(1),
        },
    }
}

/// Cut `body` down to [`PREVIEW_CHARS`] characters, marking the cut with an
/// ellipsis. Bodies at or under the limit pass through untouched. Counts
/// characters, not bytes, so multibyte text never splits.
fn preview(body: &str) -> String {
    match body.char_indices().nth(PREVIEW_CHARS) {
        None => body.to_string(),
        Some((cut, _)) => format!("{}...", &body[..cut]),
    }
}

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author: PostAuthorResponse {
            id: post.author.id.to_string(),
            username: post.author.username,
        },
        title: post.title,
        body: post.body,
        tags: post.tags,
        published_at: post.published_at.to_rfc3339(),
    }
}

/// POST /api/posts
pub async fn write(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<WritePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_title(&req.title)?;
    validate_body(&req.body)?;
    validate_tags(&req.tags)?;

    let author = PostAuthor {
        id: identity.user_id,
        username: identity.username,
    };
    let post = state
        .posts
        .insert(Post::new(author, req.title, req.body, req.tags))
        .await?;
    tracing::info!(post_id = %post.id, author = %post.author.username, "Published post");

    Ok(HttpResponse::Created().json(to_response(post)))
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = parse_page(query.page.as_deref())?;
    let filter = PostFilter::new(query.username, query.tag);

    let result = state.posts.find_page(&filter, page).await?;

    let posts: Vec<PostResponse> = result
        .posts
        .into_iter()
        .map(|post| {
            let mut response = to_response(post);
            response.body = preview(&response.body);
            response
        })
        .collect();

    Ok(HttpResponse::Ok()
        .insert_header((LAST_PAGE_HEADER, result.last_page.to_string()))
        .json(posts))
}

/// GET /api/posts/{id}
pub async fn read(PostById(post): PostById) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    PostById(post): PostById,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    require_owner(&identity, &post)?;

    let req = body.into_inner();
    if let Some(title) = &req.title {
        validate_title(title)?;
    }
    if let Some(body) = &req.body {
        validate_body(body)?;
    }
    if let Some(tags) = &req.tags {
        validate_tags(tags)?;
    }

    let patch = PostPatch {
        title: req.title,
        body: req.body,
        tags: req.tags,
    };
    if patch.is_empty() {
        return Ok(HttpResponse::Ok().json(to_response(post)));
    }

    let updated = state.posts.update(&post.apply(patch)).await?;

    Ok(HttpResponse::Ok().json(to_response(updated)))
}

/// DELETE /api/posts/{id}
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    PostById(post): PostById,
) -> AppResult<HttpResponse> {
    require_owner(&identity, &post)?;

    state.posts.delete(post.id).await?;
    tracing::info!(post_id = %post.id, "Deleted post");

    Ok(HttpResponse::NoContent().finish())
}
