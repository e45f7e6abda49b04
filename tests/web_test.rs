use std::fs;
use std::path::Path;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use viva::web_server::{build_router, AppState};
use viva::{CompletionClient, InterviewSession};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_student_files(dir: &Path, student_id: &str) {
    fs::create_dir_all(dir.join("midterm")).unwrap();
    fs::create_dir_all(dir.join("mygpt")).unwrap();
    fs::write(
        dir.join("midterm").join(format!("{student_id}.json")),
        r#"{"recursion": "weak"}"#,
    )
    .unwrap();
    fs::write(
        dir.join("mygpt").join(format!("{student_id}.json")),
        r#"{"loops": ["why use a for-loop?"]}"#,
    )
    .unwrap();
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}

async fn seeded_state(mock_server: &MockServer) -> AppState {
    let dir = tempfile::tempdir().unwrap();
    write_student_files(dir.path(), "111403538");

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("請問你的姓名是？")))
        .up_to_n_times(1)
        .mount(mock_server)
        .await;

    let client = CompletionClient::new(mock_server.uri(), "test-key");
    let session = InterviewSession::new(dir.path(), "111403538", client).unwrap();
    let state = AppState::new(session).unwrap();
    state.seed_opening_turn().await.unwrap();
    state
}

#[tokio::test]
async fn test_index_shows_seeded_opening_turn() {
    let mock_server = MockServer::start().await;
    let state = seeded_state(&mock_server).await;

    let server = TestServer::new(build_router(state)).unwrap();
    let response = server.get("/").await;

    response.assert_status_ok();
    let page = response.text();
    assert!(page.contains("開始口試"));
    assert!(page.contains("請問你的姓名是？"));
    assert!(page.contains("你:"));
    assert!(page.contains("AI:"));
}

#[tokio::test]
async fn test_submitting_a_turn_extends_the_chat_log() {
    let mock_server = MockServer::start().await;
    let state = seeded_state(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("王小明你好，請問你的學號是？")),
        )
        .mount(&mock_server)
        .await;

    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.post("/turn").form(&[("message", "我叫王小明")]).await;
    response.assert_status(StatusCode::SEE_OTHER);

    let page = server.get("/").await.text();
    assert!(page.contains("我叫王小明"));
    assert!(page.contains("王小明你好，請問你的學號是？"));
}

#[tokio::test]
async fn test_blank_input_submits_no_turn() {
    let mock_server = MockServer::start().await;
    let state = seeded_state(&mock_server).await;

    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.post("/turn").form(&[("message", "   ")]).await;
    response.assert_status(StatusCode::SEE_OTHER);

    // Only the seeded opening call reached the endpoint.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_failed_turn_returns_bad_gateway() {
    let mock_server = MockServer::start().await;
    let state = seeded_state(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.post("/turn").form(&[("message", "我叫王小明")]).await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}
