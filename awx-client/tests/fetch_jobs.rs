//! Integration tests for `AwxClient::fetch_jobs` against a local HTTP server.

use std::time::Duration;

use awx_client::{AwxClient, ClientError, Credentials};
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;

const JOBS_BODY: &str = r#"{
    "results": [
        {
            "id": 1,
            "status": "successful",
            "elapsed": 3.2,
            "summary_fields.organization": { "name": "Default" },
            "summary_fields.labels": [{ "name": "prod" }]
        },
        {
            "id": 2,
            "status": "failed",
            "elapsed": 0.4,
            "summary_fields.organization": { "name": "Ops" },
            "summary_fields.labels": []
        }
    ]
}"#;

/// "admin:secret" in base64
const EXPECTED_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base: &str, password: &str) -> AwxClient {
    AwxClient::new(
        format!("{}/api/v2/jobs/", base),
        Credentials::new("admin", password),
        Duration::from_secs(2),
    )
    .unwrap()
}

async fn authenticated_jobs(headers: HeaderMap) -> (StatusCode, String) {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(EXPECTED_AUTH);

    if authorized {
        (StatusCode::OK, JOBS_BODY.to_string())
    } else {
        (
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"Authentication credentials were not provided."}"#.to_string(),
        )
    }
}

#[tokio::test]
async fn test_fetches_and_decodes_jobs_with_basic_auth() -> anyhow::Result<()> {
    let base = spawn_server(Router::new().route("/api/v2/jobs/", get(authenticated_jobs))).await;

    let jobs = client_for(&base, "secret").fetch_jobs().await?;

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, 1);
    assert_eq!(jobs[0].organization, "Default");
    assert_eq!(jobs[0].labels, vec!["prod"]);
    assert_eq!(jobs[1].status, "failed");
    assert!(jobs[1].labels.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_wrong_credentials_are_an_api_error() {
    let base = spawn_server(Router::new().route("/api/v2/jobs/", get(authenticated_jobs))).await;

    let err = client_for(&base, "wrong").fetch_jobs().await.unwrap_err();

    assert!(err.is_client_error(), "unexpected error: {err}");
    assert!(matches!(err, ClientError::ApiError { status: 401, .. }));
}

#[tokio::test]
async fn test_server_error_is_an_api_error() {
    let app = Router::new().route(
        "/api/v2/jobs/",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = spawn_server(app).await;

    let err = client_for(&base, "secret").fetch_jobs().await.unwrap_err();

    assert!(err.is_server_error());
    assert!(err.to_string().contains("upstream down"));
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let app = Router::new().route("/api/v2/jobs/", get(|| async { "<html>login</html>" }));
    let base = spawn_server(app).await;

    let err = client_for(&base, "secret").fetch_jobs().await.unwrap_err();

    assert!(matches!(err, ClientError::ParseError(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn test_slow_server_hits_the_timeout() {
    let app = Router::new().route(
        "/api/v2/jobs/",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            JOBS_BODY
        }),
    );
    let base = spawn_server(app).await;

    let client = AwxClient::new(
        format!("{}/api/v2/jobs/", base),
        Credentials::new("admin", "secret"),
        Duration::from_millis(200),
    )
    .unwrap();

    let err = client.fetch_jobs().await.unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_unreachable_host_is_a_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{}", addr), "secret")
        .fetch_jobs()
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::RequestFailed(_)));
}
