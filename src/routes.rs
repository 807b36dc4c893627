// src/routes.rs

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{questions, teacher},
    state::AppState,
    views::UPLOADS_URL_PREFIX,
};

/// Largest accepted request body, uploads included.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Student routes: question list, submissions, comments and votes.
/// * Teacher routes: unanswered list and answer submission.
/// * Uploaded images served straight from the upload directory.
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);

    let student_routes = Router::new()
        .route("/", get(questions::student_page))
        .route("/submit_question", post(questions::submit_question))
        .route("/add_comment", post(questions::add_comment))
        .route("/upvote/{id}", post(questions::upvote))
        .route("/downvote/{id}", post(questions::downvote));

    let teacher_routes = Router::new()
        .route("/teacher", get(teacher::teacher_page))
        .route("/submit_answer", post(teacher::submit_answer));

    Router::new()
        .merge(student_routes)
        .merge(teacher_routes)
        .route("/health", get(health))
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
