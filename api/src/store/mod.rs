//! Persistence collaborators of the comment handler.
//!
//! Every store is a trait object so the handler never reaches for a global
//! connection. [`Stores::postgres`] wires all of them to one connection pool.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{
    comment::{Comment, CommentFilter, NewComment},
    post::Post,
    user::User,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::{DbPool, PgStore};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("couldn't get a database connection: {0}")]
    Pool(#[from] diesel_async::pooled_connection::deadpool::PoolError),

    #[error("{0} with id `{1}` does not exist")]
    Missing(&'static str, i32),
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, StoreError>;

    /// Persists the mutable fields of `post` and returns the stored row.
    async fn save(&self, post: &Post) -> Result<Post, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    /// Persists the mutable fields of `user` and returns the stored row.
    async fn save(&self, user: &User) -> Result<User, StoreError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError>;

    /// Comments matching `filter`, oldest first.
    async fn find(&self, filter: CommentFilter) -> Result<Vec<Comment>, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolves an active, unexpired session token to its user.
    async fn find_user_id(&self, token: &str) -> Result<Option<i32>, StoreError>;
}

#[derive(Clone)]
pub struct Stores {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
    pub comments: Arc<dyn CommentStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Stores {
    pub fn postgres(pool: DbPool) -> Self {
        Self::from_shared(Arc::new(PgStore::new(pool)))
    }

    /// Uses one backend for every collaborator.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: PostStore + UserStore + CommentStore + SessionStore + 'static,
    {
        Stores {
            posts: store.clone(),
            users: store.clone(),
            comments: store.clone(),
            sessions: store,
        }
    }
}
