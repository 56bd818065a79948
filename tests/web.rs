use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use sentiment_breakdown::aggregate::{Aggregator, Classifier};
use sentiment_breakdown::error::{PipelineError, Result};
use sentiment_breakdown::web::router;

fn app_with(classifier: Arc<dyn Classifier>) -> Router {
    router(Arc::new(Aggregator::new(classifier)))
}

fn app() -> Router {
    app_with(Arc::new(|clause: &str| -> Result<String> {
        match clause {
            c if c.contains("fail") => Err(PipelineError::Classification("too long".into())),
            c if c.contains("love") => Ok("positive".into()),
            c if c.contains("hate") => Ok("negative".into()),
            _ => Ok("neutral".into()),
        }
    }))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form(statement: &str) -> Request<Body> {
    let body = serde_urlencoded::to_string([("statement", statement)]).unwrap();
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn index_renders_form() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Sentiment Analysis App"));
    assert!(html.contains("name=\"statement\""));
    assert!(html.contains("Analyze Sentiment"));
}

#[tokio::test]
async fn form_submit_shows_breakdown() {
    let response = app().oneshot(form("I love it. I hate it.")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<em>Positive Percentage:</em> 50.00%"));
    assert!(html.contains("<em>Negative Percentage:</em> 50.00%"));
    assert!(html.contains("<em>Neutral Percentage:</em> 0.00%"));
    assert!(html.contains("<em>Overall Sentiment:</em> Positive"));
    assert!(html.contains("I love it. I hate it.</textarea>"));
}

#[tokio::test]
async fn blank_form_warns_without_results() {
    let response = app().oneshot(form("   ")).await.unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Please enter a statement to analyze."));
    assert!(!html.contains("Percentage"));
}

#[tokio::test]
async fn failed_clause_is_reported_but_counted() {
    let response = app().oneshot(form("love. fail here")).await.unwrap();

    let html = body_text(response).await;
    assert!(html.contains("<em>Neutral Percentage:</em> 50.00%"));
    assert!(html.contains("1 of 2 sentence(s) could not be classified"));
}

#[tokio::test]
async fn collapsed_classifier_shows_error_only() {
    let app = app_with(Arc::new(|_: &str| -> Result<String> {
        panic!("weights unloaded")
    }));
    let response = app.oneshot(form("anything")).await.unwrap();

    let html = body_text(response).await;
    assert!(html.contains("class=\"error\">Error: Classifier stopped unexpectedly"));
    assert!(!html.contains("Percentage"));
}

#[tokio::test]
async fn json_api_returns_breakdown() {
    let response = app()
        .oneshot(json(r#"{"statement": "hate. hate. love. ok"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(value["positive"], 25.0);
    assert_eq!(value["negative"], 50.0);
    assert_eq!(value["neutral"], 25.0);
    assert_eq!(value["other"], 0.0);
    assert_eq!(value["overall"], "negative");
    assert_eq!(value["total"], 4);
    assert_eq!(value["failures"], 0);
    assert_eq!(value["clauses"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn json_api_rejects_empty_statement() {
    let response = app().oneshot(json(r#"{"statement": " "}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let value: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(value["error"], "Please enter a statement to analyze.");
}

#[tokio::test]
async fn json_api_reports_collapse_as_server_error() {
    let app = app_with(Arc::new(|_: &str| -> Result<String> {
        panic!("weights unloaded")
    }));
    let response = app
        .oneshot(json(r#"{"statement": "one. two"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let error = value["error"].as_str().unwrap();
    assert!(error.contains("Classifier stopped unexpectedly"), "{error}");
    assert!(error.contains("weights unloaded"), "{error}");
    assert!(value.get("positive").is_none());
}

#[tokio::test]
async fn form_echoes_statement_escaped() {
    let response = app().oneshot(form("<b>love</b> & more")).await.unwrap();

    let html = body_text(response).await;
    assert!(html.contains("&lt;b&gt;love&lt;"));
    assert!(html.contains("&amp; more</textarea>"));
}

#[tokio::test]
async fn healthz_is_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
