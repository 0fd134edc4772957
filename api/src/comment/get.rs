use axum::{
    Json,
    extract::{Path, State},
};

use crate::{App, error::AppError, identity::AuthUser, models::comment::Comment};

use super::{COMMENTS_NOT_FOUND, parse_id};

pub async fn get_comments(
    State(ctx): State<App>,
    Path(post_id): Path<String>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<Comment>>, AppError> {
    let post_id = parse_id(&post_id).ok_or_else(|| AppError::not_found(COMMENTS_NOT_FOUND))?;

    Ok(Json(ctx.comments.list(post_id).await?))
}
