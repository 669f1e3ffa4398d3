use super::*;
use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_LENGTH, header::CONTENT_TYPE, Request};
use tower::ServiceExt;
use webprice_core::{AnalysisSettings, Environment};

const BOUNDARY: &str = "webprice-test-boundary";

const EXPORT: &str = "PRODUTO;STATUS;PREÇO;MAIS BARATO\nTV 50;PERDENDO;100,00;90,00\n";

fn test_app(max_upload_bytes: usize) -> Router {
    build_app(AppState {
        config: Arc::new(AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "info".to_string(),
            max_upload_bytes,
            analysis: AnalysisSettings::default(),
        }),
    })
}

fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/csv\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_statuses() {
    for (code, status) in [
        ("bad_request", StatusCode::BAD_REQUEST),
        ("decode_error", StatusCode::BAD_REQUEST),
        ("structure_error", StatusCode::BAD_REQUEST),
        ("mapping_error", StatusCode::BAD_REQUEST),
        ("payload_too_large", StatusCode::PAYLOAD_TOO_LARGE),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ] {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[test]
fn api_error_body_is_flat() {
    let json = serde_json::to_value(ApiError::new("req-1", "mapping_error", "no status column"))
        .expect("serialize");
    assert_eq!(json["error"], "no status column");
    assert_eq!(json["code"], "mapping_error");
    assert_eq!(json["meta"]["request_id"], "req-1");
}

#[tokio::test]
async fn health_routes_report_ok() {
    for uri in ["/", "/api/v1/health"] {
        let response = test_app(1024)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "uri {uri}");
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].is_string());
    }
}

#[tokio::test]
async fn client_request_id_is_echoed() {
    let response = test_app(1024)
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header(REQUEST_ID_HEADER, "client-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
        Some("client-123")
    );
    let json = json_body(response).await;
    assert_eq!(json["meta"]["request_id"], "client-123");
}

#[tokio::test]
async fn analyze_returns_report_for_valid_upload() {
    for uri in ["/analyze", "/api/v1/analyze"] {
        let response = test_app(1 << 20)
            .oneshot(upload(uri, multipart_body("file", "export.csv", EXPORT.as_bytes())))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "uri {uri}");

        let json = json_body(response).await;
        let row = &json["data"][0];
        assert_eq!(row["product"], "TV 50");
        assert_eq!(row["suggested_price"].as_f64(), Some(89.1));
        assert_eq!(row["adjustment_type"], "lower_for_competitiveness");
        assert_eq!(row["original_status"], "PERDENDO");
        assert!(row.get("priority_value").is_none());
        assert_eq!(json["status_counts"]["PERDENDO"], 1);
        assert_eq!(json["ml_insights"]["total_analyzed"], 1);
        assert!(json["overview"].is_object());
        assert!(json["meta"]["request_id"].is_string());
    }
}

#[tokio::test]
async fn analyze_without_file_field_is_bad_request() {
    let response = test_app(1 << 20)
        .oneshot(upload(
            "/analyze",
            multipart_body("attachment", "export.csv", EXPORT.as_bytes()),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "bad_request");
    assert!(json["error"].as_str().is_some_and(|e| e.contains("file")));
}

#[tokio::test]
async fn analyze_rejects_unsupported_extension() {
    let response = test_app(1 << 20)
        .oneshot(upload(
            "/analyze",
            multipart_body("file", "export.xlsx", EXPORT.as_bytes()),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "bad_request");
}

#[tokio::test]
async fn analyze_rejects_empty_filename_and_empty_file() {
    for (name, content) in [("", EXPORT.as_bytes()), ("export.csv", &b""[..])] {
        let response = test_app(1 << 20)
            .oneshot(upload("/analyze", multipart_body("file", name, content)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "name {name:?}");
    }
}

#[tokio::test]
async fn analyze_rejects_non_multipart_request() {
    let response = test_app(1 << 20)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "bad_request");
}

#[tokio::test]
async fn ingestion_failure_reports_its_code() {
    let export = "PRODUTO;PREÇO;MAIS BARATO\nTV;100;90\n";
    let response = test_app(1 << 20)
        .oneshot(upload(
            "/analyze",
            multipart_body("file", "export.csv", export.as_bytes()),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "mapping_error");
    assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let big = "x".repeat(4096);
    let response = test_app(512)
        .oneshot(upload(
            "/analyze",
            multipart_body("file", "export.csv", big.as_bytes()),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
