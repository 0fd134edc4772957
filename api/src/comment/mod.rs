//! Creating and listing the comments of a post.

pub mod create;
pub mod get;
pub mod routes;

use std::sync::Arc;

use crate::{
    error::AppError,
    models::comment::{Comment, CommentFilter, NewComment},
    store::{CommentStore, PostStore, StoreError, Stores, UserStore},
};

pub use create::CommentText;

pub const POST_NOT_FOUND: &str = "Post not found";
pub const COMMENTS_NOT_FOUND: &str = "Comments not found";

#[derive(Clone)]
pub struct CommentHandler {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
    comments: Arc<dyn CommentStore>,
}

impl CommentHandler {
    pub fn new(stores: &Stores) -> Self {
        CommentHandler {
            posts: stores.posts.clone(),
            users: stores.users.clone(),
            comments: stores.comments.clone(),
        }
    }

    /// Writes the comment, then links it at the front of the post's and the
    /// author's comment lists. The three writes are not atomic: a failure
    /// part way leaves the earlier writes in place.
    pub async fn create(
        &self,
        post_id: i32,
        user_id: i32,
        text: CommentText,
    ) -> Result<Comment, AppError> {
        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(POST_NOT_FOUND))?;

        let comment = self
            .comments
            .create(NewComment {
                user_id,
                post_id: post.id,
                text: text.into_inner(),
            })
            .await?;

        post.comments.insert(0, comment.id);
        self.posts.save(&post).await?;

        // The session that authenticated the request points at this user
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::Missing("user", user_id))?;

        user.comments.insert(0, comment.id);
        self.users.save(&user).await?;

        tracing::info!(
            comment_id = comment.id,
            post_id,
            user_id,
            "Created comment"
        );

        Ok(comment)
    }

    /// All comments of an existing post, oldest first. An unknown post is
    /// reported as not found, a post without comments yields an empty list.
    pub async fn list(&self, post_id: i32) -> Result<Vec<Comment>, AppError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(AppError::not_found(COMMENTS_NOT_FOUND));
        }

        Ok(self.comments.find(CommentFilter::by_post(post_id)).await?)
    }
}

/// Ids are SERIAL integers; anything else can never name a row.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}
