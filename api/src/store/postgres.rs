use async_trait::async_trait;
use diesel::{pg::Pg, prelude::*};
use diesel_async::{
    AsyncPgConnection, RunQueryDsl,
    pooled_connection::deadpool::{Object, Pool},
};

use crate::{
    models::{
        comment::{Comment, CommentFilter, NewComment},
        post::Post,
        user::User,
    },
    schema::{comments, posts, sessions, users},
};

use super::{CommentStore, PostStore, SessionStore, StoreError, UserStore};

pub type DbPool = Pool<AsyncPgConnection>;

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        PgStore { pool }
    }

    async fn conn(&self) -> Result<Object<AsyncPgConnection>, StoreError> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, StoreError> {
        let mut conn = self.conn().await?;

        Ok(posts::table
            .find(id)
            .select(Post::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }

    async fn save(&self, post: &Post) -> Result<Post, StoreError> {
        let mut conn = self.conn().await?;

        diesel::update(posts::table.find(post.id))
            .set((
                posts::text.eq(&post.text),
                posts::comments.eq(&post.comments),
            ))
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(StoreError::Missing("post", post.id))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn().await?;

        Ok(users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let mut conn = self.conn().await?;

        diesel::update(users::table.find(user.id))
            .set((
                users::name.eq(&user.name),
                users::email.eq(&user.email),
                users::comments.eq(&user.comments),
            ))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(StoreError::Missing("user", user.id))
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut conn = self.conn().await?;

        Ok(diesel::insert_into(comments::table)
            .values(&comment)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await?)
    }

    async fn find(&self, filter: CommentFilter) -> Result<Vec<Comment>, StoreError> {
        let mut conn = self.conn().await?;

        let mut query = comments::table.into_boxed::<Pg>();
        if let Some(post_id) = filter.post_id {
            query = query.filter(comments::post_id.eq(post_id));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(comments::user_id.eq(user_id));
        }

        Ok(query
            .order(comments::id.asc())
            .select(Comment::as_select())
            .load(&mut conn)
            .await?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn find_user_id(&self, token: &str) -> Result<Option<i32>, StoreError> {
        let mut conn = self.conn().await?;

        Ok(sessions::table
            .filter(sessions::token.eq(token))
            .filter(sessions::active.eq(true))
            .filter(sessions::expires_at.gt(diesel::dsl::now))
            .filter(sessions::issued_at.le(diesel::dsl::now))
            .select(sessions::user_id)
            .first::<i32>(&mut conn)
            .await
            .optional()?)
    }
}
