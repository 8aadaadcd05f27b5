//! Author profile handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use scribe_core::domain::AuthorDraft;
use scribe_shared::CreatedResponse;

use super::{collection_url, list_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /authors
pub async fn create(state: web::Data<AppState>, body: web::Json<AuthorDraft>) -> AppResult<HttpResponse> {
    let id = state.authors.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(CreatedResponse::new(id)))
}

/// GET /authors?<query>
pub async fn list(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let page = state
        .authors
        .list(req.query_string(), &collection_url(&state, &req))
        .await?;
    Ok(list_response("authors", page))
}

/// GET /authors/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let record = state.authors.get(&path).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// PUT /authors/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AuthorDraft>,
) -> AppResult<HttpResponse> {
    let record = state.authors.update(&path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /authors/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    state.authors.delete(&path).await?;
    Ok(HttpResponse::NoContent().finish())
}
