// src/models/comment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub question_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub question_id: i64,
}

/// Urlencoded comment form.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub text: String,

    pub question_id: i64,
}
