use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{
    comment::{Comment, CommentFilter, NewComment},
    post::Post,
    user::User,
};

use super::{CommentStore, PostStore, SessionStore, StoreError, UserStore};

/// Store backed by plain maps, ids shared across tables like a SERIAL would
/// hand them out.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    next_id: i32,
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    comments: BTreeMap<i32, Comment>,
    sessions: HashMap<String, i32>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn filter_matches(filter: &CommentFilter, comment: &Comment) -> bool {
    filter.post_id.is_none_or(|id| id == comment.post_id)
        && filter.user_id.is_none_or(|id| id == comment.user_id)
}

impl MemoryStore {
    pub async fn insert_user(&self, name: &str) -> User {
        let mut state = self.state.write().await;
        let user = User {
            id: state.next_id(),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            comments: vec![],
            created_at: now(),
        };
        state.users.insert(user.id, user.clone());
        user
    }

    pub async fn insert_post(&self, user_id: i32, text: &str) -> Post {
        let mut state = self.state.write().await;
        let post = Post {
            id: state.next_id(),
            user_id,
            text: text.to_owned(),
            comments: vec![],
            created_at: now(),
        };
        state.posts.insert(post.id, post.clone());
        post
    }

    pub async fn insert_session(&self, token: &str, user_id: i32) {
        self.state
            .write()
            .await
            .sessions
            .insert(token.to_owned(), user_id);
    }

    pub async fn remove_user(&self, id: i32) {
        self.state.write().await.users.remove(&id);
    }

    pub async fn post(&self, id: i32) -> Option<Post> {
        self.state.read().await.posts.get(&id).cloned()
    }

    pub async fn user(&self, id: i32) -> Option<User> {
        self.state.read().await.users.get(&id).cloned()
    }

    pub async fn comment_count(&self) -> usize {
        self.state.read().await.comments.len()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, StoreError> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: &Post) -> Result<Post, StoreError> {
        let mut state = self.state.write().await;
        let stored = state
            .posts
            .get_mut(&post.id)
            .ok_or(StoreError::Missing("post", post.id))?;
        stored.text = post.text.clone();
        stored.comments = post.comments.clone();
        Ok(stored.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or(StoreError::Missing("user", user.id))?;
        stored.name = user.name.clone();
        stored.email = user.email.clone();
        stored.comments = user.comments.clone();
        Ok(stored.clone())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut state = self.state.write().await;
        let comment = Comment {
            id: state.next_id(),
            user_id: comment.user_id,
            post_id: comment.post_id,
            text: comment.text,
            created_at: now(),
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find(&self, filter: CommentFilter) -> Result<Vec<Comment>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .comments
            .values()
            .filter(|c| filter_matches(&filter, c))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_user_id(&self, token: &str) -> Result<Option<i32>, StoreError> {
        Ok(self.state.read().await.sessions.get(token).copied())
    }
}

/// Every call fails, as if the database went away.
pub struct FailingStore;

#[async_trait]
impl PostStore for FailingStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, StoreError> {
        Err(StoreError::Missing("post", id))
    }

    async fn save(&self, post: &Post) -> Result<Post, StoreError> {
        Err(StoreError::Missing("post", post.id))
    }
}

#[async_trait]
impl CommentStore for FailingStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError> {
        Err(StoreError::Missing("post", comment.post_id))
    }

    async fn find(&self, filter: CommentFilter) -> Result<Vec<Comment>, StoreError> {
        Err(StoreError::Missing("post", filter.post_id.unwrap_or_default()))
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn find_filters_by_post_and_user() {
        let store = MemoryStore::default();
        let alice = store.insert_user("Alice").await;
        let bob = store.insert_user("Bob").await;
        let post = store.insert_post(alice.id, "hello").await;
        let other = store.insert_post(bob.id, "world").await;

        let authored = [(alice.id, post.id), (bob.id, post.id), (bob.id, other.id)];
        for (user_id, post_id) in authored {
            store
                .create(NewComment {
                    user_id,
                    post_id,
                    text: "nice".into(),
                })
                .await
                .unwrap();
        }

        assert_eq!(
            store.find(CommentFilter::by_post(post.id)).await.unwrap().len(),
            2
        );
        assert_eq!(
            store
                .find(CommentFilter {
                    post_id: Some(post.id),
                    user_id: Some(bob.id),
                })
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(store.find(CommentFilter::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn saving_an_unknown_post_fails() {
        let store = MemoryStore::default();
        let user = store.insert_user("Alice").await;
        let mut post = store.insert_post(user.id, "hello").await;
        post.id += 100;

        assert!(matches!(
            PostStore::save(&store, &post).await,
            Err(StoreError::Missing("post", _))
        ));
    }
}
