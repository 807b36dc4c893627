// tests/upload_tests.rs

use std::path::{Path, PathBuf};

use askly::{
    config::Config,
    models::question::{NewQuestion, QuestionOrder},
    routes,
    state::AppState,
    store::Store,
    views::Views,
};
use reqwest::{StatusCode, multipart};
use tempfile::TempDir;

struct TestApp {
    address: String,
    store: Store,
    upload_dir: PathBuf,
    client: reqwest::Client,
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let database_url = format!("sqlite://{}", dir.path().join("askly.db").display());
    let upload_dir = dir.path().join("static").join("uploads");

    let store = Store::connect(&database_url, 1).await.unwrap();
    let config = Config {
        database_url,
        database_max_connections: 1,
        upload_dir: upload_dir.clone(),
        server_addr: "127.0.0.1:0".parse().unwrap(),
        question_order: QuestionOrder::Oldest,
        rust_log: "error".to_string(),
        log_dir: dir.path().join("logs"),
    };
    let state = AppState {
        store: store.clone(),
        config,
        views: Views::new().unwrap(),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        store,
        upload_dir,
        client,
        _dir: dir,
    }
}

impl TestApp {
    async fn ask_with_image(&self, text: &str, file_name: &str, bytes: &[u8]) -> StatusCode {
        let image = multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str("image/png")
            .unwrap();
        // Filenames go over the wire exactly as given.
        let form = multipart::Form::new()
            .percent_encode_noop()
            .text("text", text.to_string())
            .part("image", image);

        self.client
            .post(format!("{}/submit_question", self.address))
            .multipart(form)
            .send()
            .await
            .unwrap()
            .status()
    }
}

#[tokio::test]
async fn image_is_stored_and_served() {
    let app = spawn_app().await;

    let status = app.ask_with_image("What is this shape?", "triangle.png", b"png-bytes").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let questions = app.store.list_questions(QuestionOrder::Oldest).await.unwrap();
    let image_path = questions[0].image_path.clone().expect("image path recorded");
    assert_eq!(Path::new(&image_path), app.upload_dir.join("triangle.png"));
    assert_eq!(std::fs::read(&image_path).unwrap(), b"png-bytes");

    let page = app
        .client
        .get(format!("{}/", app.address))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("/uploads/triangle.png"));

    let served = app
        .client
        .get(format!("{}/uploads/triangle.png", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await.unwrap().as_ref(), b"png-bytes");
}

#[tokio::test]
async fn empty_file_part_leaves_image_null() {
    let app = spawn_app().await;

    let empty = multipart::Part::bytes(Vec::new()).file_name("");
    let form = multipart::Form::new().text("text", "No picture").part("image", empty);
    let response = app
        .client
        .post(format!("{}/submit_question", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let questions = app.store.list_questions(QuestionOrder::Oldest).await.unwrap();
    assert_eq!(questions[0].image_path, None);
}

/// Uploads are addressed by client filename: a second upload with the same
/// name replaces the bytes the first question points at.
#[tokio::test]
async fn same_filename_overwrites_previous_upload() {
    let app = spawn_app().await;

    app.ask_with_image("First", "diagram.png", b"first image").await;
    app.ask_with_image("Second", "diagram.png", b"second image").await;

    let questions = app.store.list_questions(QuestionOrder::Oldest).await.unwrap();
    let first_path = questions[0].image_path.clone().unwrap();
    let second_path = questions[1].image_path.clone().unwrap();

    assert_eq!(first_path, second_path);
    assert_eq!(std::fs::read(&first_path).unwrap(), b"second image");
}

#[tokio::test]
async fn traversal_filename_is_confined_to_upload_dir() {
    let app = spawn_app().await;

    let status = app.ask_with_image("Sneaky", "../../outside.png", b"x").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let questions = app.store.list_questions(QuestionOrder::Oldest).await.unwrap();
    let image_path = questions[0].image_path.clone().unwrap();
    assert_eq!(Path::new(&image_path), app.upload_dir.join("outside.png"));
    assert!(!app.upload_dir.join("../../outside.png").exists());
}

#[tokio::test]
async fn answer_image_is_stored_with_answer() {
    let app = spawn_app().await;
    let question = app
        .store
        .insert_question(NewQuestion {
            text: "Draw a circle".to_string(),
            image_path: None,
        })
        .await
        .unwrap();

    let image = multipart::Part::bytes(b"circle".to_vec())
        .file_name("circle.png")
        .mime_str("image/png")
        .unwrap();
    let form = multipart::Form::new()
        .text("question_id", question.id.to_string())
        .text("answer", "See attached")
        .text("name", "Grace")
        .text("role", "Senior")
        .part("answer_image", image);
    let response = app
        .client
        .post(format!("{}/submit_answer", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let stored = app.store.get_question(question.id).await.unwrap().unwrap();
    let answer_image = stored.answer_image_path.expect("answer image recorded");
    assert_eq!(std::fs::read(answer_image).unwrap(), b"circle");
    assert_eq!(stored.role.as_deref(), Some("Senior"));
}

#[tokio::test]
async fn answer_image_for_missing_question_is_not_written() {
    let app = spawn_app().await;

    let image = multipart::Part::bytes(b"orphan".to_vec()).file_name("orphan.png");
    let form = multipart::Form::new()
        .text("question_id", "12")
        .text("answer", "Nobody asked")
        .part("answer_image", image);
    let response = app
        .client
        .post(format!("{}/submit_answer", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!app.upload_dir.join("orphan.png").exists());
}

#[tokio::test]
async fn reserved_characters_in_filename_still_serve() {
    let app = spawn_app().await;

    let status = app.ask_with_image("Fragment?", "a#1.png", b"hash-bytes").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let page = app
        .client
        .get(format!("{}/", app.address))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("/uploads/a%231.png"));

    let served = app
        .client
        .get(format!("{}/uploads/a%231.png", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await.unwrap().as_ref(), b"hash-bytes");
}
