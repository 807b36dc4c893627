// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Form, Multipart, Path, State, multipart::MultipartRejection, rejection::FormRejection},
    response::{Html, IntoResponse, Redirect},
};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        comment::{CreateCommentRequest, NewComment},
        question::{NewQuestion, SubmitQuestionRequest},
    },
    store::Store,
    utils::{multipart::MultipartForm, upload::save_upload},
    views::{StudentPage, Views},
};

pub const STUDENT_PAGE: &str = "/";

/// Renders the student page: every question with its comments.
pub async fn student_page(
    State(store): State<Store>,
    State(config): State<Config>,
    State(views): State<Views>,
) -> Result<Html<String>, AppError> {
    let questions = store.list_questions(config.question_order).await?;
    let ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    let comments = store.comments_for(&ids).await?;

    views.student(&StudentPage::new(questions, comments))
}

/// Creates a question from a multipart form (`text`, optional `image`).
pub async fn submit_question(
    State(store): State<Store>,
    State(config): State<Config>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, AppError> {
    let mut form = MultipartForm::read(multipart?).await?;

    let payload = SubmitQuestionRequest {
        text: form.required("text")?,
    };
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let image_path = save_upload(&config.upload_dir, form.take_file("image")).await?;

    let question = store
        .insert_question(NewQuestion {
            text: payload.text,
            image_path,
        })
        .await?;

    tracing::info!(
        question_id = question.id,
        has_image = question.image_path.is_some(),
        "Question submitted"
    );

    Ok(Redirect::to(STUDENT_PAGE))
}

/// Adds a comment to an existing question.
pub async fn add_comment(
    State(store): State<Store>,
    payload: Result<Form<CreateCommentRequest>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(payload) = payload?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let comment = store
        .insert_comment(NewComment {
            text: payload.text,
            question_id: payload.question_id,
        })
        .await?;

    tracing::info!(
        comment_id = comment.id,
        question_id = comment.question_id,
        "Comment added"
    );

    Ok(Redirect::to(STUDENT_PAGE))
}

pub async fn upvote(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let upvotes = store
        .upvote(id)
        .await?
        .ok_or_else(|| question_not_found(id))?;

    tracing::debug!(question_id = id, upvotes, "Question upvoted");

    Ok(Json(serde_json::json!({ "upvotes": upvotes })))
}

pub async fn downvote(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let downvotes = store
        .downvote(id)
        .await?
        .ok_or_else(|| question_not_found(id))?;

    tracing::debug!(question_id = id, downvotes, "Question downvoted");

    Ok(Json(serde_json::json!({ "downvotes": downvotes })))
}

pub(crate) fn question_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Question {} not found", id))
}
