//! Live servers on ephemeral ports, exercised over real HTTP.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use reqwest::StatusCode;
use serde_json::{json, Value};

use twinmode_client::{OperationRecord, TransformClient};
use twinmode_core::Clock;
use twinmode_engine::controller::TIMEOUT_FALLBACK;
use twinmode_engine::{server, HomePageController, RequestContext};
use twinmode_telemetry::{Log, LogLevel, MetricsRecorder};

async fn spawn(app: Router) -> u16 {
    let listener = server::bind(0).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(server::serve(listener, app));
    port
}

async fn spawn_www(controller: HomePageController, service_port: u16, log: Log) -> u16 {
    let metrics = controller.metrics().clone();
    spawn(server::www::router(
        Arc::new(controller),
        RequestContext::new(service_port, log),
        metrics,
    ))
    .await
}

async fn post_form(port: u16, body: &'static str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn rot13_service_transforms_text() {
    let port = spawn(server::rot13::router()).await;

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/rot13/transform"))
        .json(&json!({ "text": "Hello, World!" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "transformed": "Uryyb, Jbeyq!" }));
}

#[tokio::test]
async fn rot13_service_rejects_malformed_json() {
    let port = spawn(server::rot13::router()).await;

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/rot13/transform"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
}

#[tokio::test]
async fn rot13_service_unknown_route() {
    let port = spawn(server::rot13::router()).await;
    let response = reqwest::get(format!("http://127.0.0.1:{port}/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn live_client_reports_service_status() {
    let port = spawn(server::rot13::router()).await;
    let client = TransformClient::create("127.0.0.1");

    // No routes, so every request gets a 404.
    let not_found = spawn(Router::new()).await;
    let result = client.invoke(not_found, "x").response.await;
    assert!(matches!(
        result,
        Err(twinmode_client::OperationError::Status { status: 404, .. })
    ));

    assert_eq!(
        client.invoke(port, "abc").response.await,
        Ok("nop".to_string())
    );
}

#[tokio::test]
async fn www_end_to_end() {
    let service_port = spawn(server::rot13::router()).await;
    let log = Log::create_null();
    let logs = log.track_output();
    let controller = HomePageController::new(
        TransformClient::create("127.0.0.1"),
        Clock::create(),
        5_000,
    );
    let www_port = spawn_www(controller, service_port, log).await;

    let response = post_form(www_port, "text=hello%20world").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(response.text().await.unwrap().contains("uryyb jbeyq"));
    assert!(logs.is_empty());

    let response = reqwest::get(format!("http://127.0.0.1:{www_port}/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let metrics = reqwest::get(format!("http://127.0.0.1:{www_port}/metrics"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("twinmode_requests_total 1"));
}

#[tokio::test]
async fn www_parse_error_is_still_ok() {
    let log = Log::create_null();
    let logs = log.track_output();
    let controller = HomePageController::create_null(TransformClient::create_null(), Clock::create());
    let www_port = spawn_www(controller, 1, log).await;

    let response = post_form(www_port, "other=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(logs.data()[0].level, LogLevel::Monitor);
}

#[tokio::test]
async fn www_rejects_other_methods_and_paths() {
    let controller = HomePageController::create_null(TransformClient::create_null(), Clock::create());
    let www_port = spawn_www(controller, 1, Log::create_null()).await;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("http://127.0.0.1:{www_port}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = client
        .get(format!("http://127.0.0.1:{www_port}/elsewhere"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn www_cancels_unresponsive_service() {
    // Accepts connections but never answers.
    let silent = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let service_port = silent.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = silent.accept().await {
            held.push(socket);
        }
    });

    let client = TransformClient::create("127.0.0.1");
    let calls = client.track_calls();
    let log = Log::create_null();
    let logs = log.track_output();
    let metrics = MetricsRecorder::new();
    let controller = HomePageController::new(client, Clock::create(), 100).with_metrics(metrics.clone());
    let www_port = spawn_www(controller, service_port, log).await;

    let response = tokio::time::timeout(Duration::from_secs(5), post_form(www_port, "text=hi"))
        .await
        .unwrap();

    assert!(response.text().await.unwrap().contains(TIMEOUT_FALLBACK));
    assert_eq!(
        calls.data(),
        vec![
            OperationRecord::call(service_port, "hi"),
            OperationRecord::cancellation(service_port, "hi"),
        ]
    );
    assert_eq!(logs.data()[0].field("timeoutInMs"), Some(&Value::from(100)));
    assert_eq!(metrics.operation_timeouts.get(), 1);
}
