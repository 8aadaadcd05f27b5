//! HTTP handlers and route configuration.

mod authors;
mod blog_posts;
mod comments;
mod health;
mod users;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, web};
use scribe_core::service::Page;
use scribe_shared::{ErrorResponse, ListResponse};
use serde_json::Value;

use crate::middleware::error::AppError;
use crate::observability::RequestId;
use crate::state::AppState;

/// Configure all application routes under `base_path`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, base_path: &str) {
    cfg.app_data(json_config()).service(
        web::scope(base_path)
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/blogPosts")
                    .route("", web::get().to(blog_posts::list))
                    .route("", web::post().to(blog_posts::create))
                    .route("/{id}", web::get().to(blog_posts::get))
                    .route("/{id}", web::put().to(blog_posts::update))
                    .route("/{id}", web::delete().to(blog_posts::delete))
                    // Comments are embedded in their post
                    .route("/{id}", web::post().to(comments::add))
                    .route("/{id}/comments", web::get().to(comments::list))
                    .route("/{id}/comments/{comment_id}", web::get().to(comments::get))
                    .route("/{id}/comments/{comment_id}", web::put().to(comments::update))
                    .route("/{id}/comments/{comment_id}", web::delete().to(comments::delete)),
            )
            .service(
                web::scope("/authors")
                    .route("", web::get().to(authors::list))
                    .route("", web::post().to(authors::create))
                    .route("/{id}", web::get().to(authors::get))
                    .route("/{id}", web::put().to(authors::update))
                    .route("/{id}", web::delete().to(authors::delete)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list))
                    .route("", web::post().to(users::create))
                    .route("/{id}", web::get().to(users::get))
                    .route("/{id}", web::put().to(users::update))
                    .route("/{id}", web::delete().to(users::delete)),
            ),
    );
}

/// Malformed or mistyped JSON bodies are reported as 400 problem details.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("invalid JSON body: {err}")).into())
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    let problem = ErrorResponse::not_found(format!("No route for {} {}", req.method(), req.path()))
        .with_instance(req.path())
        .with_request_id(request_id.as_str());
    HttpResponse::NotFound().json(problem)
}

/// Public URL of the collection the request addressed; pagination links
/// point back at it.
fn collection_url(state: &AppState, req: &HttpRequest) -> String {
    format!("{}{}", state.public_url, req.path())
}

/// Wrap a listing page in the `{links, total, numberOfPages, <collection>}`
/// envelope.
fn list_response(collection: &'static str, page: Page<Value>) -> HttpResponse {
    HttpResponse::Ok().json(ListResponse {
        collection,
        links: page.links,
        total: page.total,
        number_of_pages: page.number_of_pages,
        items: page.items,
    })
}
