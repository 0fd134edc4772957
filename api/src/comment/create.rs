use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::{App, error::AppError, identity::AuthUser, models::comment::Comment};

use super::{POST_NOT_FOUND, parse_id};

pub const MAX_TEXT_CHARS: usize = 200;

pub const TEXT_REQUIRED: &str = "Text is required";
pub const TEXT_TOO_LONG: &str = "Text must be less than 200 characters";

#[derive(Deserialize)]
pub struct CommentSubmission {
    #[serde(default)]
    text: Option<String>,
}

/// Comment text that passed validation: non-empty and at most
/// [`MAX_TEXT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentText(String);

impl CommentText {
    pub fn parse(text: Option<String>) -> Result<Self, &'static str> {
        let text = text.unwrap_or_default();

        if text.is_empty() {
            return Err(TEXT_REQUIRED);
        }

        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(TEXT_TOO_LONG);
        }

        Ok(CommentText(text))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[debug_handler]
pub async fn create_comment(
    State(ctx): State<App>,
    Path(post_id): Path<String>,
    AuthUser(user_id): AuthUser,
    crate::json::Json(submission): crate::json::Json<CommentSubmission>,
) -> Result<Json<Comment>, AppError> {
    let text = CommentText::parse(submission.text).map_err(AppError::bad_request)?;

    let post_id = parse_id(&post_id).ok_or_else(|| AppError::not_found(POST_NOT_FOUND))?;

    let comment = ctx.comments.create(post_id, user_id, text).await?;

    Ok(Json(comment))
}
