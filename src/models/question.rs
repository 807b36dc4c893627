// src/models/question.rs

use std::str::FromStr;

use serde::Serialize;
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Question {
    pub id: i64,

    /// The text content of the question, stored verbatim.
    pub text: String,

    /// Path of the uploaded illustration, as written by the upload handler.
    pub image_path: Option<String>,

    /// A question is answered iff this is set.
    pub answer: Option<String>,
    pub answer_image_path: Option<String>,

    /// Free-text name of whoever answered.
    pub answered_by: Option<String>,
    /// Free-text role of the answerer, e.g. "Teacher" or "Senior".
    pub role: Option<String>,

    pub upvotes: i64,
    pub downvotes: i64,
}

impl Question {
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

/// Fields needed to insert a question. Counters start at zero, the answer empty.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub image_path: Option<String>,
}

/// Fields written when a question gets answered.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub answer: String,
    pub answered_by: Option<String>,
    pub role: Option<String>,
    /// `None` keeps whatever image the answer already had.
    pub answer_image_path: Option<String>,
}

/// Text fields of the multipart question form.
#[derive(Debug, Validate)]
pub struct SubmitQuestionRequest {
    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub text: String,
}

/// Text fields of the multipart answer form.
#[derive(Debug, Validate)]
pub struct SubmitAnswerRequest {
    pub question_id: i64,

    #[validate(length(min = 1, message = "Answer must not be empty"))]
    pub answer: String,

    pub name: Option<String>,
    pub role: Option<String>,
}

/// Ordering used by the student page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionOrder {
    /// Most upvoted first; ties keep submission order.
    #[default]
    Upvotes,
    /// Submission order.
    Oldest,
}

impl FromStr for QuestionOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upvotes" => Ok(QuestionOrder::Upvotes),
            "oldest" => Ok(QuestionOrder::Oldest),
            other => Err(format!("unknown question order: {}", other)),
        }
    }
}
