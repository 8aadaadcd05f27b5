use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{Page, ResourceSettings, parse_id, repo_error, to_json};
use crate::domain::{BlogPost, BlogPostDraft, BlogPostPatch, Comment, ReadTime, Record};
use crate::error::DomainError;
use crate::ports::{BlogPostRepository, UserRepository};

/// A post as returned to clients: `author` reduced to its summary fields and
/// `likes` resolved to user summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostView {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub cover: String,
    pub read_time: ReadTime,
    pub author: Value,
    pub likes: Vec<Value>,
    pub content: String,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A listing page. Items are JSON because the `fields` projection may drop
/// any field except `id`.
pub type BlogPostPage = Page<Value>;

/// Blog post operations over the post and user stores.
pub struct BlogPostService {
    posts: Arc<dyn BlogPostRepository>,
    users: Arc<dyn UserRepository>,
    settings: ResourceSettings,
}

impl BlogPostService {
    pub fn new(
        posts: Arc<dyn BlogPostRepository>,
        users: Arc<dyn UserRepository>,
        settings: ResourceSettings,
    ) -> Self {
        Self {
            posts,
            users,
            settings,
        }
    }

    /// Validate and store a new post, returning its id.
    pub async fn create(&self, draft: BlogPostDraft) -> Result<Uuid, DomainError> {
        let post = draft.into_blog_post(Utc::now())?;
        let saved = self.posts.insert(post).await?;
        tracing::info!(blog_post_id = %saved.id, "Blog post created");
        Ok(saved.id)
    }

    /// List posts matching `query_string`. `base_url` is the public URL of the
    /// collection, used for the pagination links.
    pub async fn list(&self, query_string: &str, base_url: &str) -> Result<BlogPostPage, DomainError> {
        let query = self.settings.translator.translate_str(query_string)?;

        let posts = self.posts.find_many(&query).await?;
        let total = self.posts.count(&query.filter).await?;

        let mut items = Vec::with_capacity(posts.len());
        for view in self.resolve(posts).await? {
            let mut item = to_json(&view)?;
            query.projection.apply(&mut item);
            items.push(item);
        }

        Ok(Page {
            links: query.links(base_url, total),
            total,
            number_of_pages: query.number_of_pages(total),
            items,
        })
    }

    pub async fn get(&self, id: &str) -> Result<BlogPostView, DomainError> {
        let post_id = parse_id::<BlogPost>(id)?;
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found(BlogPost::KIND, id))?;
        self.resolve_one(post).await
    }

    /// Apply a partial update and return the updated post.
    pub async fn update(&self, id: &str, patch: BlogPostPatch) -> Result<BlogPostView, DomainError> {
        let post_id = parse_id::<BlogPost>(id)?;
        let changes = patch.validate(Utc::now())?;
        let post = self
            .posts
            .update_fields(post_id, &changes)
            .await?
            .ok_or_else(|| DomainError::not_found(BlogPost::KIND, id))?;
        tracing::info!(blog_post_id = %post_id, "Blog post updated");
        self.resolve_one(post).await
    }

    /// Delete a post together with its comments.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let post_id = parse_id::<BlogPost>(id)?;
        self.posts
            .delete(post_id)
            .await
            .map_err(repo_error::<BlogPost>(id))?;
        tracing::info!(blog_post_id = %post_id, "Blog post deleted");
        Ok(())
    }

    async fn resolve_one(&self, post: BlogPost) -> Result<BlogPostView, DomainError> {
        self.resolve(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal("resolved post went missing".to_string()))
    }

    /// Resolve `likes` for a batch of posts with one user lookup.
    async fn resolve(&self, posts: Vec<BlogPost>) -> Result<Vec<BlogPostView>, DomainError> {
        let liked: Vec<Uuid> = posts
            .iter()
            .flat_map(|p| p.likes.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut summaries = HashMap::new();
        if !liked.is_empty() {
            for user in self.users.find_by_ids(&liked).await? {
                summaries.insert(user.id, self.settings.summary_fields.reduce(to_json(&user)?));
            }
        }

        posts
            .into_iter()
            .map(|post| {
                let author = self.settings.summary_fields.reduce(to_json(&post.author)?);
                let likes = post
                    .likes
                    .iter()
                    .filter_map(|id| summaries.get(id).cloned())
                    .collect();
                Ok(BlogPostView {
                    id: post.id,
                    category: post.category,
                    title: post.title,
                    cover: post.cover,
                    read_time: post.read_time,
                    author,
                    likes,
                    content: post.content,
                    comments: post.comments,
                    created_at: post.created_at,
                    updated_at: post.updated_at,
                })
            })
            .collect()
    }
}
