//! End-to-end exercises of the submission cycle against a local mock of
//! the analysis service.

use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use titlescan::candidate::UploadCandidate;
use titlescan::classify::{FailureKind, GENERIC_GUIDANCE, NETWORK_GUIDANCE, TIMEOUT_GUIDANCE};
use titlescan::client::AnalysisClient;
use titlescan::render;
use titlescan::session::{AnalysisSession, ProcessingState, SettledOutcome};

/// Serve the given router on an ephemeral port, returning the API base.
async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });
    format!("http://{}/api", addr)
}

fn client(base: &str) -> AnalysisClient {
    AnalysisClient::with_timeout(base, Duration::from_secs(5))
}

fn pdf_candidate(size: usize) -> UploadCandidate {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.resize(size, b'x');
    UploadCandidate::new("policy.pdf", "application/pdf", bytes)
}

/// Validates the multipart contract and answers with a partial result.
async fn analyze_partial(mut multipart: Multipart) -> impl IntoResponse {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "missing file part"})),
            )
                .into_response()
        }
    };

    if field.name() != Some("file") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "wrong part name"})),
        )
            .into_response();
    }
    if field.content_type() != Some("application/pdf") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "wrong content type"})),
        )
            .into_response();
    }
    if field.file_name() != Some("policy.pdf") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "wrong filename"})),
        )
            .into_response();
    }
    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "unreadable body"})),
            )
                .into_response()
        }
    };
    if bytes.len() != 2 * 1024 * 1024 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "unexpected size"})),
        )
            .into_response();
    }

    Json(json!({
        "effective_date": "2024-01-01",
        "insured_party": "J. Doe"
    }))
    .into_response()
}

#[tokio::test]
async fn partial_result_end_to_end() {
    let app = Router::new()
        .route("/api/analyze-document", post(analyze_partial))
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024));
    let base = spawn_backend(app).await;

    let mut session = AnalysisSession::new();
    let outcome = session
        .submit(&client(&base), pdf_candidate(2 * 1024 * 1024))
        .await
        .expect("state machine accepts a fresh submission");

    let SettledOutcome::Result(result) = outcome else {
        panic!("expected a result, got {:?}", outcome);
    };
    assert_eq!(result.effective_date.as_deref(), Some("2024-01-01"));
    assert_eq!(result.insured_party.as_deref(), Some("J. Doe"));
    assert!(result.underwriter.is_none());

    // Two fields populated, four marked not found, no compliance section.
    let text = render::render_plain(result);
    assert_eq!(text.matches(render::NOT_FOUND_PLACEHOLDER).count(), 4);
    assert!(!text.contains("Compliance Notes"));
}

#[tokio::test]
async fn full_result_preserves_note_order() {
    let app = Router::new().route(
        "/api/analyze-document",
        post(|| async {
            Json(json!({
                "id": "abc123",
                "effective_date": "2023-06-15",
                "insured_party": "Jane Roe",
                "underwriter": "First American",
                "legal_description": "Lot 4, Block 2",
                "exceptions": "Easement of record",
                "policy_amount": "$410,000",
                "compliance_notes": ["note a", "note b", "note c"],
                "processing_status": "completed"
            }))
        }),
    );
    let base = spawn_backend(app).await;

    let mut session = AnalysisSession::new();
    let outcome = session
        .submit(&client(&base), pdf_candidate(64))
        .await
        .unwrap();

    let SettledOutcome::Result(result) = outcome else {
        panic!("expected a result");
    };
    assert_eq!(
        result.compliance_notes,
        vec!["note a", "note b", "note c"]
    );
    assert!(result.fields().iter().all(|(_, v)| v.is_some()));
}

#[tokio::test]
async fn backend_detail_is_used_verbatim() {
    let app = Router::new().route(
        "/api/analyze-document",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "file too large"})),
            )
        }),
    );
    let base = spawn_backend(app).await;

    let mut session = AnalysisSession::new();
    let outcome = session
        .submit(&client(&base), pdf_candidate(64))
        .await
        .unwrap();

    let SettledOutcome::Failure(failure) = outcome else {
        panic!("expected a failure");
    };
    assert_eq!(failure.kind, FailureKind::BackendReported);
    assert_eq!(failure.message, "file too large");
}

#[tokio::test]
async fn timeout_yields_smaller_file_guidance() {
    let app = Router::new().route(
        "/api/analyze-document",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({}))
        }),
    );
    let base = spawn_backend(app).await;

    let slow_client = AnalysisClient::with_timeout(&base, Duration::from_millis(200));
    let mut session = AnalysisSession::new();
    let outcome = session
        .submit(&slow_client, pdf_candidate(64))
        .await
        .unwrap();

    let SettledOutcome::Failure(failure) = outcome else {
        panic!("expected a failure");
    };
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert_eq!(failure.message, TIMEOUT_GUIDANCE);
}

#[tokio::test]
async fn unreachable_service_yields_connectivity_guidance() {
    // Grab an ephemeral port, then close it so connections are refused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = format!("http://{}/api", addr);
    let mut session = AnalysisSession::new();
    let outcome = session
        .submit(&client(&base), pdf_candidate(64))
        .await
        .unwrap();

    let SettledOutcome::Failure(failure) = outcome else {
        panic!("expected a failure");
    };
    assert_eq!(failure.kind, FailureKind::NetworkUnavailable);
    assert_eq!(failure.message, NETWORK_GUIDANCE);
}

#[tokio::test]
async fn malformed_success_payload_is_generic() {
    let app = Router::new().route(
        "/api/analyze-document",
        post(|| async { "this is not json" }),
    );
    let base = spawn_backend(app).await;

    let mut session = AnalysisSession::new();
    let outcome = session
        .submit(&client(&base), pdf_candidate(64))
        .await
        .unwrap();

    let SettledOutcome::Failure(failure) = outcome else {
        panic!("expected a failure");
    };
    assert_eq!(failure.kind, FailureKind::Unknown);
    assert_eq!(failure.message, GENERIC_GUIDANCE);
}

#[tokio::test]
async fn reset_after_settle_restores_acquisition() {
    let app = Router::new().route(
        "/api/analyze-document",
        post(|| async { Json(json!({"effective_date": "2024-01-01"})) }),
    );
    let base = spawn_backend(app).await;

    let mut session = AnalysisSession::new();
    session
        .submit(&client(&base), pdf_candidate(64))
        .await
        .unwrap();
    assert!(session.result().is_some());

    session.reset().unwrap();
    assert_eq!(*session.state(), ProcessingState::Idle);
    assert!(session.result().is_none());
    assert!(session.failure().is_none());
    assert!(session.accepts_input());
}

#[tokio::test]
async fn health_probe_parses_service_map() {
    let app = Router::new().route(
        "/api/health",
        get(|| async {
            Json(json!({
                "status": "healthy",
                "services": {"tesseract": "available", "openai": "configured"}
            }))
        }),
    );
    let base = spawn_backend(app).await;

    let health = client(&base).health().await.expect("health probe");
    assert_eq!(health.status, "healthy");
    assert_eq!(
        health.services.get("openai").map(String::as_str),
        Some("configured")
    );
}
