//! Research Stream Client Integration Tests
//!
//! The HTTP client against a local socket that speaks just enough HTTP to
//! stream frames: clean completion, non-OK responses, caller cancellation
//! mid-stream, and transport failure mid-body.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use trust_recon::services::research::{ResearchBackend, ResearchClient, StreamOutcome};
use trust_recon::{AppError, PhaseStatus};

const STREAM_BODY: &str = concat!(
    "data: {\"entity_identification\": {\"query\": \"notion\"}}\n",
    "data: {\"security_analysis\": {\"notes\": \"CVE-2025-1234\"}}\n",
    "data: {\"write_research_brief\": {\"research_brief\": \"Looks solid.\"}}\n",
);

/// Serve one connection: read the request, send `status_line` headers and
/// the first `send_len` bytes of `body` (declaring the full length), then
/// either finish or hold the socket open.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
    send_len: usize,
    hold_open: bool,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 8192];
        let _ = socket.read(&mut buf).await;

        let headers = format!(
            "{}\r\nContent-Type: text/event-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status_line,
            body.len()
        );
        socket.write_all(headers.as_bytes()).await.unwrap();
        socket.write_all(&body.as_bytes()[..send_len]).await.unwrap();
        socket.flush().await.unwrap();

        if hold_open {
            // Keep the connection alive without sending the rest.
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });

    format!("http://{}/runs/stream", addr)
}

#[tokio::test]
async fn test_clean_stream_completes_with_full_progress() {
    let endpoint = serve_once("HTTP/1.1 200 OK", STREAM_BODY, STREAM_BODY.len(), false).await;
    let client = ResearchClient::new(endpoint);

    let outcome = client
        .stream_research("notion", None, CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        StreamOutcome::Completed(progress) => {
            assert!(progress.all_phases_complete());
            assert_eq!(progress.report_text.as_deref(), Some("Looks solid."));
            assert_eq!(progress.findings, vec!["CVE-2025-1234".to_string()]);
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_ok_response_is_upstream_error() {
    let endpoint = serve_once("HTTP/1.1 500 Internal Server Error", "boom", 4, false).await;
    let client = ResearchClient::new(endpoint);

    let result = client
        .stream_research("notion", None, CancellationToken::new())
        .await;
    assert!(matches!(result, Err(AppError::Upstream(_))));
}

#[tokio::test]
async fn test_cancellation_mid_stream_is_aborted_with_partial_state() {
    // Only the first frame is delivered; the server then stalls.
    let first_frame_len = STREAM_BODY.find('\n').unwrap() + 1;
    let endpoint = serve_once("HTTP/1.1 200 OK", STREAM_BODY, first_frame_len, true).await;
    let client = ResearchClient::new(endpoint);

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let outcome = client
        .stream_research("notion", None, cancel)
        .await
        .unwrap();

    match outcome {
        StreamOutcome::Aborted(progress) => {
            // Partial results accumulated before the abort stay visible.
            assert_eq!(progress.phases[0].status, PhaseStatus::Active);
            assert!(progress.report_text.is_none());
        }
        other => panic!("expected Aborted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_failure_mid_body_is_failed_with_partial_state() {
    // The server closes after half the promised body; the transport
    // surfaces an error, not a clean end.
    let first_frame_len = STREAM_BODY.find('\n').unwrap() + 1;
    let endpoint = serve_once("HTTP/1.1 200 OK", STREAM_BODY, first_frame_len, false).await;
    let client = ResearchClient::new(endpoint);

    let outcome = client
        .stream_research("notion", None, CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        StreamOutcome::Failed { progress, error } => {
            assert_eq!(progress.phases[0].status, PhaseStatus::Active);
            assert!(!error.is_empty());
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}
