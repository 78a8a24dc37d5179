//! HTTP endpoint tests: real server on an ephemeral port, in-process search
//! and page fetches, wiremock generation backend.

use quizbot::config::ServerConfig;
use quizbot::{AnswerServer, AnswerService, AppConfig};
use quizbot_search::{FetchFailure, PageFetcher, Retriever, SearchBackend, SearchError, SearchHit};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct OneHit {
    fail: bool,
}

impl SearchBackend for OneHit {
    async fn query(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        if self.fail {
            return Err(SearchError::Backend("HTTP 500".into()));
        }
        Ok(vec![SearchHit::new("https://a.example/")])
    }

    fn name(&self) -> &'static str {
        "one-hit"
    }
}

struct StaticPage;

impl PageFetcher for StaticPage {
    async fn fetch(&self, _url: &str) -> Result<String, FetchFailure> {
        Ok("<p>Founded in 1900.</p>".to_owned())
    }
}

async fn start(fail_search: bool) -> (AnswerServer, MockServer) {
    let generation = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"generated_text": "Correct answer: 2\nReasoning: founded in 1900"}
        ])))
        .mount(&generation)
        .await;

    let mut config = AppConfig::default();
    config.api.url = format!("{}/generate", generation.uri());
    config.api.model_name = "test-model".into();

    let retriever = Retriever::new(OneHit { fail: fail_search }, StaticPage, &config.search);
    let service = Arc::new(AnswerService::with_retriever(retriever, &config).unwrap());

    let server_config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
    };
    let server = AnswerServer::start(service, &server_config).await.unwrap();
    (server, generation)
}

fn endpoint(server: &AnswerServer) -> String {
    format!("http://127.0.0.1:{}/api/request", server.port())
}

#[tokio::test]
async fn answers_request() {
    let (server, _generation) = start(false).await;
    assert_ne!(server.port(), 0);

    let response = reqwest::Client::new()
        .post(endpoint(&server))
        .json(&json!({"id": 42, "query": "Founded?\n1. 1890\n2. 1900"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "id": 42,
            "answer": 2,
            "reasoning": "Answer generated by model test-model. founded in 1900",
            "sources": ["https://a.example/"],
        })
    );
}

#[tokio::test]
async fn search_failure_is_bad_gateway() {
    let (server, _generation) = start(true).await;

    let response = reqwest::Client::new()
        .post(endpoint(&server))
        .json(&json!({"id": 1, "query": "q"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("HTTP 500"));
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (server, _generation) = start(false).await;

    let response = reqwest::Client::new()
        .post(endpoint(&server))
        .header("content-type", "application/json")
        .body(r#"{"id": "not a number"}"#)
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn shutdown_stops_serving() {
    let (server, _generation) = start(false).await;
    let url = endpoint(&server);
    server.shutdown();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let result = reqwest::Client::new()
        .post(url)
        .json(&json!({"id": 1, "query": "q"}))
        .send()
        .await;

    assert!(result.is_err());
}
