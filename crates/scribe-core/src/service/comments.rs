use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::{parse_id, repo_error};
use crate::domain::{BlogPost, Comment, CommentDraft, Record};
use crate::error::DomainError;
use crate::ports::BlogPostRepository;

const COMMENT: &str = "Comment";

/// Operations on the comments embedded in a blog post.
pub struct CommentService {
    posts: Arc<dyn BlogPostRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn BlogPostRepository>) -> Self {
        Self { posts }
    }

    async fn parent(&self, post_id: &str) -> Result<BlogPost, DomainError> {
        let id = parse_id::<BlogPost>(post_id)?;
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(BlogPost::KIND, post_id))
    }

    /// Append a comment; returns the updated parent post.
    pub async fn add(&self, post_id: &str, draft: CommentDraft) -> Result<BlogPost, DomainError> {
        let id = parse_id::<BlogPost>(post_id)?;
        let comment = draft.into_comment(Utc::now())?;
        let comment_id = comment.id;
        let post = self
            .posts
            .push_comment(id, comment)
            .await?
            .ok_or_else(|| DomainError::not_found(BlogPost::KIND, post_id))?;
        tracing::info!(blog_post_id = %id, comment_id = %comment_id, "Comment added");
        Ok(post)
    }

    /// The parent's comments in insertion order.
    pub async fn list(&self, post_id: &str) -> Result<Vec<Comment>, DomainError> {
        Ok(self.parent(post_id).await?.comments)
    }

    pub async fn get(&self, post_id: &str, comment_id: &str) -> Result<Comment, DomainError> {
        let post = self.parent(post_id).await?;
        Uuid::parse_str(comment_id)
            .ok()
            .and_then(|cid| post.comment(cid).cloned())
            .ok_or_else(|| DomainError::not_found(COMMENT, comment_id))
    }

    /// Merge `draft` into an existing comment and persist the parent.
    ///
    /// This is a read-modify-write of the whole post: a concurrent write to the
    /// same post between the read and the replace is overwritten.
    pub async fn update(
        &self,
        post_id: &str,
        comment_id: &str,
        draft: CommentDraft,
    ) -> Result<Comment, DomainError> {
        let mut post = self.parent(post_id).await?;
        let index = Uuid::parse_str(comment_id)
            .ok()
            .and_then(|cid| post.comments.iter().position(|c| c.id == cid))
            .ok_or_else(|| DomainError::not_found(COMMENT, comment_id))?;

        let now = Utc::now();
        draft.merge_into(&mut post.comments[index], now)?;
        post.updated_at = now;

        let saved = self
            .posts
            .replace(post)
            .await
            .map_err(repo_error::<BlogPost>(post_id))?;
        tracing::info!(blog_post_id = %saved.id, comment_id, "Comment updated");

        saved
            .comments
            .into_iter()
            .nth(index)
            .ok_or_else(|| DomainError::not_found(COMMENT, comment_id))
    }

    /// Remove a comment. Removing a comment that does not exist succeeds as
    /// long as the parent exists.
    pub async fn delete(&self, post_id: &str, comment_id: &str) -> Result<(), DomainError> {
        let Ok(cid) = Uuid::parse_str(comment_id) else {
            // Nothing can match; only the parent's existence matters.
            self.parent(post_id).await?;
            return Ok(());
        };
        let id = parse_id::<BlogPost>(post_id)?;
        self.posts
            .pull_comment(id, cid, Utc::now())
            .await?
            .ok_or_else(|| DomainError::not_found(BlogPost::KIND, post_id))?;
        tracing::info!(blog_post_id = %id, comment_id = %cid, "Comment deleted");
        Ok(())
    }
}
