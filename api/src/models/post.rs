use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: i32,
    #[serde(rename = "user")]
    pub user_id: i32,
    pub text: String,
    /// Newest first
    pub comments: Vec<i32>,
    pub created_at: NaiveDateTime,
}
