use axum::{Router, routing::get};

use crate::App;

use super::{create::create_comment, get::get_comments};

pub fn route() -> Router<App> {
    Router::<App>::new().route("/{post_id}", get(get_comments).post(create_comment))
}
