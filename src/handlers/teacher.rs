// src/handlers/teacher.rs

use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    response::{Html, Redirect},
};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    handlers::questions::question_not_found,
    models::question::{NewAnswer, SubmitAnswerRequest},
    store::Store,
    utils::{multipart::MultipartForm, upload::save_upload},
    views::{TeacherPage, Views},
};

pub const TEACHER_PAGE: &str = "/teacher";

/// Lists the questions nobody has answered yet.
pub async fn teacher_page(
    State(store): State<Store>,
    State(views): State<Views>,
) -> Result<Html<String>, AppError> {
    let unanswered = store.list_unanswered().await?;

    views.teacher(&TeacherPage::new(unanswered))
}

/// Answers a question from a multipart form
/// (`question_id`, `answer`, optional `name`, `role`, `answer_image`).
///
/// The image is only stored once the question is known to exist. The update
/// that follows can only miss if the question vanished in between; no
/// operation deletes questions, so a stored image never lacks its question.
pub async fn submit_answer(
    State(store): State<Store>,
    State(config): State<Config>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, AppError> {
    let mut form = MultipartForm::read(multipart?).await?;

    let question_id = form
        .required("question_id")?
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest("question_id must be an integer".to_string()))?;

    let payload = SubmitAnswerRequest {
        question_id,
        answer: form.required("answer")?,
        name: form.optional("name"),
        role: form.optional("role"),
    };
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if store.get_question(payload.question_id).await?.is_none() {
        return Err(question_not_found(payload.question_id));
    }

    let answer_image_path = save_upload(&config.upload_dir, form.take_file("answer_image")).await?;

    let question = store
        .answer_question(
            payload.question_id,
            NewAnswer {
                answer: payload.answer,
                answered_by: payload.name,
                role: payload.role,
                answer_image_path,
            },
        )
        .await?
        .ok_or_else(|| question_not_found(payload.question_id))?;

    tracing::info!(
        question_id = question.id,
        answered_by = question.answered_by.as_deref().unwrap_or("anonymous"),
        "Question answered"
    );

    Ok(Redirect::to(TEACHER_PAGE))
}
