//! Handlers for the comments embedded in a blog post.

use actix_web::{HttpResponse, web};

use scribe_core::domain::CommentDraft;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /blogPosts/{id}
///
/// Responds with the whole updated post.
pub async fn add(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CommentDraft>,
) -> AppResult<HttpResponse> {
    let post = state.comments.add(&path, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /blogPosts/{id}/comments
pub async fn list(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let comments = state.comments.list(&path).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// GET /blogPosts/{id}/comments/{comment_id}
pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state.comments.get(&post_id, &comment_id).await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// PUT /blogPosts/{id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<CommentDraft>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .comments
        .update(&post_id, &comment_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// DELETE /blogPosts/{id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state.comments.delete(&post_id, &comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
