//! User handlers. Users are what a post's `likes` point at.

use actix_web::{HttpRequest, HttpResponse, web};

use scribe_core::domain::UserDraft;
use scribe_shared::CreatedResponse;

use super::{collection_url, list_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /users
pub async fn create(state: web::Data<AppState>, body: web::Json<UserDraft>) -> AppResult<HttpResponse> {
    let id = state.users.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(CreatedResponse::new(id)))
}

/// GET /users?<query>
pub async fn list(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let page = state
        .users
        .list(req.query_string(), &collection_url(&state, &req))
        .await?;
    Ok(list_response("users", page))
}

/// GET /users/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let record = state.users.get(&path).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// PUT /users/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UserDraft>,
) -> AppResult<HttpResponse> {
    let record = state.users.update(&path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /users/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    state.users.delete(&path).await?;
    Ok(HttpResponse::NoContent().finish())
}
