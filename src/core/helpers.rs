use crate::config::{MAX_CONTENT_LENGTH, MAX_USERNAME_LENGTH};
use crate::core::errors::{ApiError, Result};
use crate::models::models::{CreatePostRequest, NewPost};

/// Check that a text field is present, not blank, free of NUL, and within `max_chars`.
/// The value is returned untouched.
pub fn require_text(field: &'static str, value: Option<String>, max_chars: usize) -> Result<String> {
    let value = value.ok_or_else(|| ApiError::validation(field, "is required"))?;

    if value.trim().is_empty() {
        return Err(ApiError::validation(field, "must not be empty"));
    }
    // Postgres text columns cannot hold NUL.
    if value.contains('\0') {
        return Err(ApiError::validation(field, "must not contain NUL characters"));
    }
    if value.chars().count() > max_chars {
        return Err(ApiError::validation(
            field,
            format!("must be at most {} characters", max_chars),
        ));
    }

    Ok(value)
}

pub fn validate_new_post(req: CreatePostRequest) -> Result<NewPost> {
    let username = require_text("username", req.username, MAX_USERNAME_LENGTH)?;
    let content = require_text("content", req.content, MAX_CONTENT_LENGTH)?;
    Ok(NewPost { username, content })
}
