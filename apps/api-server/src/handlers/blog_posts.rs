//! Blog post handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use scribe_core::domain::{BlogPostDraft, BlogPostPatch};
use scribe_shared::CreatedResponse;

use super::{collection_url, list_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /blogPosts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<BlogPostDraft>,
) -> AppResult<HttpResponse> {
    let id = state.blog_posts.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(CreatedResponse::new(id)))
}

/// GET /blogPosts?<query>
pub async fn list(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let page = state
        .blog_posts
        .list(req.query_string(), &collection_url(&state, &req))
        .await?;
    Ok(list_response("blogPosts", page))
}

/// GET /blogPosts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.blog_posts.get(&path).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /blogPosts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BlogPostPatch>,
) -> AppResult<HttpResponse> {
    let post = state.blog_posts.update(&path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /blogPosts/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    state.blog_posts.delete(&path).await?;
    Ok(HttpResponse::NoContent().finish())
}
