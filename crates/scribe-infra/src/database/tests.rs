#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use crate::database::memory::{
        InMemoryAuthorRepository, InMemoryBlogPostRepository, InMemoryUserRepository,
    };
    use scribe_core::domain::{AuthorDraft, BlogPostDraft, CommentDraft, UserDraft};
    use scribe_core::error::DomainError;
    use scribe_core::ports::{BaseRepository, BlogPostRepository};
    use scribe_core::query::QueryTranslator;
    use scribe_core::service::{
        AuthorService, BlogPostService, CommentService, ResourceSettings, UserService,
    };

    const BASE: &str = "http://localhost:3005/blogPosts";

    struct Fixture {
        posts: Arc<InMemoryBlogPostRepository>,
        users: Arc<InMemoryUserRepository>,
        blog_posts: BlogPostService,
        comments: CommentService,
    }

    fn fixture() -> Fixture {
        let posts = Arc::new(InMemoryBlogPostRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        Fixture {
            blog_posts: BlogPostService::new(
                posts.clone(),
                users.clone(),
                ResourceSettings::default(),
            ),
            comments: CommentService::new(posts.clone()),
            posts,
            users,
        }
    }

    fn draft(title: &str, category: &str, minutes: u32) -> BlogPostDraft {
        serde_json::from_value(json!({
            "category": category,
            "title": title,
            "cover": "https://img.example/cover.png",
            "readTime": { "value": minutes, "unit": "minutes" },
            "author": { "name": "Ada Lovelace", "avatar": "https://img.example/ada.png" },
            "content": "Lorem ipsum"
        }))
        .unwrap()
    }

    fn comment(username: &str, text: &str) -> CommentDraft {
        CommentDraft {
            username: Some(username.to_string()),
            text: Some(text.to_string()),
            rating: None,
        }
    }

    /// Let the clock move so successive timestamps differ.
    async fn tick() {
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    async fn seed(fx: &Fixture, count: u32) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for i in 0..count {
            let id = fx
                .blog_posts
                .create(draft(&format!("Post {i}"), "rust", i + 1))
                .await
                .unwrap();
            ids.push(id);
        }
        ids
    }

    #[tokio::test]
    async fn test_get_returns_created_post() {
        let fx = fixture();
        let id = fx.blog_posts.create(draft("Ownership", "rust", 4)).await.unwrap();

        let view = fx.blog_posts.get(&id.to_string()).await.unwrap();

        assert_eq!(view.id, id);
        assert_eq!(view.title, "Ownership");
        // Author is reduced to the summary fields.
        assert_eq!(view.author, json!({ "name": "Ada Lovelace" }));
    }

    #[tokio::test]
    async fn test_get_unknown_or_malformed_id_is_not_found() {
        let fx = fixture();
        let missing = Uuid::new_v4().to_string();
        assert!(matches!(
            fx.blog_posts.get(&missing).await,
            Err(DomainError::NotFound { entity_type: "BlogPost", .. })
        ));
        assert!(matches!(
            fx.blog_posts.get("not-an-id").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let fx = fixture();
        seed(&fx, 5).await;

        let page = fx.blog_posts.list("limit=2&skip=0", BASE).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.number_of_pages, 3);
        assert_eq!(page.links.next.as_deref(), Some(format!("{BASE}?limit=2&skip=2").as_str()));
        assert_eq!(page.links.last.as_deref(), Some(format!("{BASE}?limit=2&skip=4").as_str()));
    }

    #[tokio::test]
    async fn test_list_skip_past_total_is_empty() {
        let fx = fixture();
        seed(&fx, 3).await;

        let page = fx.blog_posts.list("skip=10", BASE).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_list_filters_sorts_and_projects() {
        let fx = fixture();
        seed(&fx, 4).await;
        fx.blog_posts.create(draft("Goroutines", "go", 9)).await.unwrap();

        let page = fx
            .blog_posts
            .list("category=rust&sort=-readTime.value&fields=title", BASE)
            .await
            .unwrap();

        assert_eq!(page.total, 4);
        let titles: Vec<&str> = page
            .items
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Post 3", "Post 2", "Post 1", "Post 0"]);
        assert!(page.items[0].get("id").is_some());
        assert!(page.items[0].get("content").is_none());
    }

    #[tokio::test]
    async fn test_likes_resolve_to_user_summaries() {
        let fx = fixture();
        let user = UserDraft {
            user_name: Some("grace".into()),
        }
        .into_user(Utc::now())
        .unwrap();
        let user_id = user.id;
        fx.users.insert(user).await.unwrap();

        let mut post = draft("Liked", "rust", 3);
        post.likes = Some(vec![user_id, Uuid::new_v4()]);
        let id = fx.blog_posts.create(post).await.unwrap();

        let view = fx.blog_posts.get(&id.to_string()).await.unwrap();
        assert_eq!(
            view.likes,
            vec![json!({ "id": user_id.to_string(), "userName": "grace" })]
        );
    }

    #[tokio::test]
    async fn test_update_changes_fields_and_bumps_updated_at() {
        let fx = fixture();
        let id = fx.blog_posts.create(draft("Ownership", "rust", 4)).await.unwrap();
        let before = fx.posts.find_by_id(id).await.unwrap().unwrap();
        tick().await;

        let patch = serde_json::from_value(json!({ "title": "Borrowing" })).unwrap();
        let after = fx.blog_posts.update(&id.to_string(), patch).await.unwrap();

        assert_eq!(after.title, "Borrowing");
        assert_eq!(after.category, "rust");
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);

        let stored = fx.posts.find_by_id(id).await.unwrap().unwrap();
        assert!(stored.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_post_is_not_found() {
        let fx = fixture();
        let patch = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert!(matches!(
            fx.blog_posts.update(&Uuid::new_v4().to_string(), patch).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_comment_appends_one_entry() {
        let fx = fixture();
        let id = seed(&fx, 1).await[0].to_string();

        fx.comments.add(&id, comment("grace", "First")).await.unwrap();
        let post = fx.comments.add(&id, comment("alan", "Second")).await.unwrap();

        assert_eq!(post.comments.len(), 2);
        let added = &post.comments[1];
        assert_eq!(added.username, "alan");
        assert_eq!(added.created_at, added.updated_at);
        assert_eq!(post.updated_at, added.created_at);

        let listed = fx.comments.list(&id).await.unwrap();
        assert_eq!(listed[0].text, "First");
        assert_eq!(listed[1].text, "Second");
    }

    #[tokio::test]
    async fn test_add_comment_to_missing_post_is_not_found() {
        let fx = fixture();
        assert!(matches!(
            fx.comments
                .add(&Uuid::new_v4().to_string(), comment("grace", "Hi"))
                .await,
            Err(DomainError::NotFound { entity_type: "BlogPost", .. })
        ));
    }

    #[tokio::test]
    async fn test_get_comment_by_id() {
        let fx = fixture();
        let id = seed(&fx, 1).await[0].to_string();
        let post = fx.comments.add(&id, comment("grace", "Hi")).await.unwrap();
        let comment_id = post.comments[0].id.to_string();

        let found = fx.comments.get(&id, &comment_id).await.unwrap();
        assert_eq!(found.text, "Hi");

        assert!(matches!(
            fx.comments.get(&id, &Uuid::new_v4().to_string()).await,
            Err(DomainError::NotFound { entity_type: "Comment", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_comment_merges_fields() {
        let fx = fixture();
        let id = seed(&fx, 1).await[0].to_string();
        let post = fx.comments.add(&id, comment("grace", "Hi")).await.unwrap();
        let original = post.comments[0].clone();
        tick().await;

        let updated = fx
            .comments
            .update(
                &id,
                &original.id.to_string(),
                CommentDraft {
                    text: Some("Edited".into()),
                    rating: Some(4.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.username, "grace");
        assert_eq!(updated.text, "Edited");
        assert_eq!(updated.rating, Some(4.0));
        assert!(updated.updated_at > original.updated_at);
        assert_eq!(updated.created_at, original.created_at);

        let stored = fx.posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.comments[0].text, "Edited");
        assert_eq!(stored.updated_at, updated.updated_at);
        assert!(stored.updated_at > post.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_comment_is_not_found() {
        let fx = fixture();
        let id = seed(&fx, 1).await[0].to_string();
        fx.comments.add(&id, comment("grace", "Hi")).await.unwrap();

        let result = fx
            .comments
            .update(&id, &Uuid::new_v4().to_string(), comment("x", "y"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound { entity_type: "Comment", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_comment_is_idempotent() {
        let fx = fixture();
        let id = seed(&fx, 1).await[0].to_string();
        let post = fx.comments.add(&id, comment("grace", "Hi")).await.unwrap();
        let comment_id = post.comments[0].id.to_string();

        fx.comments.delete(&id, &comment_id).await.unwrap();
        fx.comments.delete(&id, &comment_id).await.unwrap();
        fx.comments.delete(&id, "not-a-comment").await.unwrap();

        assert!(fx.comments.list(&id).await.unwrap().is_empty());
        assert!(matches!(
            fx.comments.delete(&Uuid::new_v4().to_string(), &comment_id).await,
            Err(DomainError::NotFound { entity_type: "BlogPost", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_comment_bumps_parent_updated_at() {
        let fx = fixture();
        let id = seed(&fx, 1).await[0];
        let post = fx.comments.add(&id.to_string(), comment("grace", "Hi")).await.unwrap();
        let before = fx.posts.find_by_id(id).await.unwrap().unwrap();
        tick().await;

        fx.comments
            .delete(&id.to_string(), &post.comments[0].id.to_string())
            .await
            .unwrap();

        let after = fx.posts.find_by_id(id).await.unwrap().unwrap();
        assert!(after.comments.is_empty());
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_delete_post_removes_it_and_its_comments() {
        let fx = fixture();
        let id = seed(&fx, 1).await[0].to_string();
        fx.comments.add(&id, comment("grace", "Hi")).await.unwrap();

        fx.blog_posts.delete(&id).await.unwrap();

        assert!(matches!(fx.blog_posts.get(&id).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(fx.comments.list(&id).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(fx.blog_posts.delete(&id).await, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_pull_comment_on_missing_post_returns_none() {
        let repo = InMemoryBlogPostRepository::new();
        let result = repo
            .pull_comment(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_author_crud() {
        let authors = AuthorService::new(
            Arc::new(InMemoryAuthorRepository::new()),
            QueryTranslator::default(),
        );
        let id = authors
            .create(AuthorDraft {
                name: Some("Ada".into()),
                avatar: Some("ada.png".into()),
            })
            .await
            .unwrap()
            .to_string();

        let updated = authors
            .update(
                &id,
                AuthorDraft {
                    name: Some("Ada Lovelace".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.avatar, "ada.png");
        assert!(updated.updated_at >= updated.created_at);

        authors.delete(&id).await.unwrap();
        assert!(matches!(
            authors.get(&id).await,
            Err(DomainError::NotFound { entity_type: "Author", .. })
        ));
    }

    #[tokio::test]
    async fn test_author_create_reports_every_missing_field() {
        let authors = AuthorService::new(
            Arc::new(InMemoryAuthorRepository::new()),
            QueryTranslator::default(),
        );
        match authors.create(AuthorDraft::default()).await {
            Err(DomainError::Validation(msg)) => {
                assert!(msg.contains("name is required"));
                assert!(msg.contains("avatar is required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_user_list_filters_by_regex() {
        let users = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            QueryTranslator::default(),
        );
        for name in ["grace", "Gregor", "alan"] {
            users
                .create(UserDraft {
                    user_name: Some(name.into()),
                })
                .await
                .unwrap();
        }

        let page = users
            .list("userName=/^gr/i&sort=userName", "http://localhost:3005/users")
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.number_of_pages, 1);
        assert_eq!(page.items[0]["userName"], "Gregor");
        assert_eq!(page.items[1]["userName"], "grace");
    }
}
