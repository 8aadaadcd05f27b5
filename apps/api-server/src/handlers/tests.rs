use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::{StatusCode, header},
    test,
};
use serde_json::{Value, json};
use uuid::Uuid;

use scribe_infra::DocumentStore;

use crate::build_app;
use crate::config::AppConfig;
use crate::middleware::OriginGuard;
use crate::state::AppState;

const ALLOWED_ORIGIN: &str = "http://localhost:3000";

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 3005,
        base_path: String::new(),
        public_url: "http://localhost:3005".to_string(),
        database: None,
        allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        summary_fields: ["firstName", "lastName", "userName", "name"]
            .map(String::from)
            .to_vec(),
        default_page_limit: 10,
        max_page_limit: 100,
    }
}

fn app_with(
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = Error,
        InitError = (),
    > + use<>,
> {
    build_app(
        AppState::with_store(DocumentStore::in_memory(), config),
        OriginGuard::new(config.allowed_origins.clone()),
        config.base_path.clone(),
    )
}

fn post_body(title: &str) -> Value {
    json!({
        "category": "rust",
        "title": title,
        "cover": "https://img.example/cover.png",
        "readTime": { "value": 5, "unit": "minutes" },
        "author": { "name": "Ada Lovelace", "avatar": "https://img.example/ada.png" },
        "content": "Lorem ipsum"
    })
}

/// POST a body and return the `id` from the 201 response.
macro_rules! create {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["id"].as_str().unwrap().to_string()
    }};
}

macro_rules! add_comment {
    ($app:expr, $post_id:expr) => {{
        let req = test::TestRequest::post()
            .uri(&format!("/blogPosts/{}", $post_id))
            .set_json(json!({ "username": "grace", "text": "Nice read", "rating": 5 }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "in-memory");
}

#[actix_web::test]
async fn test_create_returns_id_and_get_returns_post() {
    let app = test::init_service(app_with(&test_config())).await;
    let id = create!(app, "/blogPosts", post_body("Ownership"));
    assert!(Uuid::parse_str(&id).is_ok());

    let req = test::TestRequest::get()
        .uri(&format!("/blogPosts/{id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["title"], "Ownership");
    assert_eq!(body["author"], json!({ "name": "Ada Lovelace" }));
    assert_eq!(body["comments"], json!([]));
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[actix_web::test]
async fn test_create_with_missing_fields_is_rejected() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::post()
        .uri("/blogPosts")
        .set_json(json!({ "title": "Only a title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("category"));
    assert!(detail.contains("content"));
    assert!(!detail.contains("title"));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::post()
        .uri("/blogPosts")
        .insert_header(header::ContentType::json())
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_post_is_not_found() {
    let app = test::init_service(app_with(&test_config())).await;
    let missing = Uuid::new_v4();

    let req = test::TestRequest::get()
        .uri(&format!("/blogPosts/{missing}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], format!("BlogPost with id {missing} not found!"));

    let req = test::TestRequest::get().uri("/blogPosts/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_list_paginates_with_links() {
    let app = test::init_service(app_with(&test_config())).await;
    for i in 0..5 {
        create!(app, "/blogPosts", post_body(&format!("Post {i}")));
    }

    let req = test::TestRequest::get()
        .uri("/blogPosts?limit=2&skip=0")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["blogPosts"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 5);
    assert_eq!(body["numberOfPages"], 3);
    assert_eq!(
        body["links"]["next"],
        "http://localhost:3005/blogPosts?limit=2&skip=2"
    );
    assert!(body["links"].get("prev").is_none());
}

#[actix_web::test]
async fn test_list_with_skip_past_u64_range_is_an_empty_page() {
    let app = test::init_service(app_with(&test_config())).await;
    for i in 0..3 {
        create!(app, "/blogPosts", post_body(&format!("Post {i}")));
    }

    let req = test::TestRequest::get()
        .uri("/blogPosts?limit=2&skip=18446744073709551615")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["blogPosts"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 3);
    assert!(body["links"].get("next").is_none());
    assert!(body["links"].get("last").is_none());
}

#[actix_web::test]
async fn test_list_with_invalid_limit_is_bad_request() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::get()
        .uri("/blogPosts?limit=0")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_post_and_resolve_likes() {
    let app = test::init_service(app_with(&test_config())).await;
    let user_id = create!(app, "/users", json!({ "userName": "grace" }));
    let post_id = create!(app, "/blogPosts", post_body("Ownership"));

    let req = test::TestRequest::put()
        .uri(&format!("/blogPosts/{post_id}"))
        .set_json(json!({ "title": "Borrowing", "likes": [user_id] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["title"], "Borrowing");
    assert_eq!(
        body["likes"],
        json!([{ "id": user_id, "userName": "grace" }])
    );
}

#[actix_web::test]
async fn test_add_comment_appends_with_equal_timestamps() {
    let app = test::init_service(app_with(&test_config())).await;
    let post_id = create!(app, "/blogPosts", post_body("Ownership"));

    let post = add_comment!(app, post_id);

    let comments = post["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["username"], "grace");
    assert_eq!(comments[0]["createdAt"], comments[0]["updatedAt"]);

    let req = test::TestRequest::get()
        .uri(&format!("/blogPosts/{post_id}/comments"))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_get_and_update_comment() {
    let app = test::init_service(app_with(&test_config())).await;
    let post_id = create!(app, "/blogPosts", post_body("Ownership"));
    let post = add_comment!(app, post_id);
    let comment_id = post["comments"][0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/blogPosts/{post_id}/comments/{comment_id}"))
        .set_json(json!({ "text": "Edited" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["id"], comment_id.as_str());
    assert_eq!(updated["text"], "Edited");
    assert_eq!(updated["username"], "grace");

    let req = test::TestRequest::get()
        .uri(&format!("/blogPosts/{post_id}/comments/{comment_id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["text"], "Edited");
}

#[actix_web::test]
async fn test_update_unknown_comment_is_not_found() {
    let app = test::init_service(app_with(&test_config())).await;
    let post_id = create!(app, "/blogPosts", post_body("Ownership"));
    add_comment!(app, post_id);
    let missing = Uuid::new_v4();

    let req = test::TestRequest::put()
        .uri(&format!("/blogPosts/{post_id}/comments/{missing}"))
        .set_json(json!({ "text": "Edited" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], format!("Comment with id {missing} not found!"));
}

#[actix_web::test]
async fn test_delete_unknown_comment_succeeds() {
    let app = test::init_service(app_with(&test_config())).await;
    let post_id = create!(app, "/blogPosts", post_body("Ownership"));

    let req = test::TestRequest::delete()
        .uri(&format!("/blogPosts/{post_id}/comments/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_deleted_post_is_gone_with_its_comments() {
    let app = test::init_service(app_with(&test_config())).await;
    let post_id = create!(app, "/blogPosts", post_body("Ownership"));
    add_comment!(app, post_id);

    let req = test::TestRequest::delete()
        .uri(&format!("/blogPosts/{post_id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    for uri in [
        format!("/blogPosts/{post_id}"),
        format!("/blogPosts/{post_id}/comments"),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}

#[actix_web::test]
async fn test_authors_list_uses_collection_key() {
    let app = test::init_service(app_with(&test_config())).await;
    let id = create!(
        app,
        "/authors",
        json!({ "name": "Ada", "avatar": "https://img.example/ada.png" })
    );

    let req = test::TestRequest::get().uri("/authors").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["authors"][0]["id"], id.as_str());
}

#[actix_web::test]
async fn test_request_without_origin_passes() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::get().uri("/blogPosts").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        !resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[actix_web::test]
async fn test_allowed_origin_gets_cors_headers() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::get()
        .uri("/blogPosts")
        .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
}

#[actix_web::test]
async fn test_unknown_origin_is_rejected() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::get()
        .uri("/blogPosts")
        .insert_header((header::ORIGIN, "http://evil.test"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["detail"],
        "Origin http://evil.test is not in the whitelist!"
    );
}

#[actix_web::test]
async fn test_preflight_from_allowed_origin() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/blogPosts")
        .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let methods = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let app = test::init_service(app_with(&test_config())).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("X-Request-ID", "req-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-42");
}

#[actix_web::test]
async fn test_unknown_route_and_base_path() {
    let config = AppConfig {
        base_path: "/api".to_string(),
        ..test_config()
    };
    let app = test::init_service(app_with(&config)).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}
