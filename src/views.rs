// src/views.rs

use std::{collections::HashMap, path::Path, sync::Arc};

use axum::response::Html;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;
use url::Url;

use crate::{
    error::AppError,
    models::{comment::Comment, question::Question},
    utils::html::clean_html,
};

pub const STUDENT_TEMPLATE: &str = "student";
pub const TEACHER_TEMPLATE: &str = "teacher";

/// URL prefix the upload directory is served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Compiled page templates, shared by all requests.
#[derive(Clone)]
pub struct Views {
    registry: Arc<Handlebars<'static>>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(STUDENT_TEMPLATE, include_str!("../templates/student.hbs"))?;
        registry.register_template_string(TEACHER_TEMPLATE, include_str!("../templates/teacher.hbs"))?;

        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    pub fn student(&self, page: &StudentPage) -> Result<Html<String>, AppError> {
        Ok(Html(self.registry.render(STUDENT_TEMPLATE, page)?))
    }

    pub fn teacher(&self, page: &TeacherPage) -> Result<Html<String>, AppError> {
        Ok(Html(self.registry.render(TEACHER_TEMPLATE, page)?))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentView {
    pub id: i64,
    pub text: String,
}

/// Plain data handed to the templates; detached from storage types.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionView {
    pub id: i64,
    pub text: String,
    pub image_url: Option<String>,
    pub answered: bool,
    /// Sanitized HTML, rendered unescaped.
    pub answer_html: Option<String>,
    pub answer_image_url: Option<String>,
    pub answered_by: Option<String>,
    pub role: Option<String>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub comments: Vec<CommentView>,
}

impl QuestionView {
    pub fn new(question: Question, comments: Vec<CommentView>) -> Self {
        Self {
            id: question.id,
            answered: question.is_answered(),
            text: question.text,
            image_url: question.image_path.as_deref().and_then(upload_url),
            answer_html: question.answer.as_deref().map(clean_html),
            answer_image_url: question.answer_image_path.as_deref().and_then(upload_url),
            answered_by: question.answered_by,
            role: question.role,
            upvotes: question.upvotes,
            downvotes: question.downvotes,
            comments,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentPage {
    pub questions: Vec<QuestionView>,
}

impl StudentPage {
    /// Attaches every comment to its question, keeping both input orders.
    pub fn new(questions: Vec<Question>, comments: Vec<Comment>) -> Self {
        let mut by_question: HashMap<i64, Vec<CommentView>> = HashMap::new();
        for comment in comments {
            by_question
                .entry(comment.question_id)
                .or_default()
                .push(CommentView {
                    id: comment.id,
                    text: comment.text,
                });
        }

        let questions = questions
            .into_iter()
            .map(|q| {
                let comments = by_question.remove(&q.id).unwrap_or_default();
                QuestionView::new(q, comments)
            })
            .collect();

        Self { questions }
    }
}

#[derive(Debug, Serialize)]
pub struct TeacherPage {
    pub questions: Vec<QuestionView>,
}

impl TeacherPage {
    pub fn new(unanswered: Vec<Question>) -> Self {
        Self {
            questions: unanswered
                .into_iter()
                .map(|q| QuestionView::new(q, Vec::new()))
                .collect(),
        }
    }
}

/// Maps a stored upload path to the URL it is served under.
/// The file name is percent-encoded as a single path segment.
fn upload_url(stored_path: &str) -> Option<String> {
    let name = Path::new(stored_path).file_name()?.to_string_lossy();

    let mut url = Url::parse("http://localhost/").ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push(UPLOADS_URL_PREFIX.trim_start_matches('/'))
        .push(&name);

    Some(url.path().to_string())
}
