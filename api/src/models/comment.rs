use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: i32,
    #[serde(rename = "user")]
    pub user_id: i32,
    #[serde(rename = "post")]
    pub post_id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub user_id: i32,
    pub post_id: i32,
    pub text: String,
}

/// Narrows a comment lookup. Unset fields match everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommentFilter {
    pub post_id: Option<i32>,
    pub user_id: Option<i32>,
}

impl CommentFilter {
    pub fn by_post(post_id: i32) -> Self {
        CommentFilter {
            post_id: Some(post_id),
            ..Default::default()
        }
    }
}
