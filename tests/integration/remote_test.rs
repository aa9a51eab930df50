//! Remote endpoint integration tests.
//!
//! Each test starts a one-shot HTTP server on a random local port.

use smart_complete::autocomplete::{
    AutocompleteField, CandidateFilter, FilterRunner, MaxResults, OptionOverrides, RemoteSource,
    Source,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves one request with the given status and body.
/// Resolves to the request target (path and query) once the request is read.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let request = String::from_utf8_lossy(&request);
        let target = request
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or_default()
            .to_string();
        let _ = tx.send(target);

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (format!("http://{addr}/autocomplete"), rx)
}

fn remote_field(url: &str, max_results: MaxResults) -> AutocompleteField {
    AutocompleteField::attach(
        "city",
        OptionOverrides::new()
            .min_char_limit(1)
            .delay_ms(0)
            .max_results(max_results)
            .source(Source::remote(url).unwrap()),
    )
}

fn shown(field: &AutocompleteField) -> Vec<String> {
    field
        .container()
        .items()
        .iter()
        .map(|item| item.text.clone())
        .collect()
}

#[tokio::test]
async fn test_remote_filter_sends_term() {
    let (url, target) = serve_once("200 OK", r#"["New York", ["Newark", 7]]"#).await;
    let remote = RemoteSource::new(&url).unwrap();

    let results = remote.filter("new y").await.unwrap();

    assert_eq!(target.await.unwrap(), "/autocomplete?term=new+y");
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].text, "Newark");
    assert_eq!(results[1].id, Some(serde_json::json!(7)));
}

#[tokio::test]
async fn test_remote_results_reach_the_container() {
    let (url, _target) = serve_once("200 OK", r#"["Boston", "Baltimore", "Buffalo"]"#).await;
    let mut field = remote_field(&url, MaxResults::Limit(2));
    let mut runner = FilterRunner::new();

    let job = field.query_changed("b").into_job().expect("remote pass is deferred");
    runner.submit(job);

    let outcome = tokio::time::timeout(Duration::from_secs(5), runner.recv())
        .await
        .expect("filter pass finished")
        .expect("runner is open");
    assert!(field.apply_results(outcome.generation, outcome.results));

    // The endpoint's answer is capped like a static list
    assert_eq!(shown(&field), vec!["Boston", "Baltimore"]);
    assert!(field.container().is_visible());
}

#[tokio::test]
async fn test_remote_error_status_is_reported() {
    let (url, _target) = serve_once("500 Internal Server Error", "oops").await;
    let remote = RemoteSource::new(&url).unwrap();

    let err = remote.filter("x").await.unwrap_err();
    assert_eq!(err.category(), "Request Error");
}

#[tokio::test]
async fn test_remote_bad_body_is_a_source_error() {
    let (url, _target) = serve_once("200 OK", r#"{"not": "a list"}"#).await;
    let remote = RemoteSource::new(&url).unwrap();

    let err = remote.filter("x").await.unwrap_err();
    assert_eq!(err.category(), "Source Error");
}

#[tokio::test]
async fn test_remote_failure_leaves_field_unchanged() {
    let (url, _target) = serve_once("503 Service Unavailable", "").await;
    let mut field = remote_field(&url, MaxResults::Unlimited);
    let mut runner = FilterRunner::new();

    runner.submit(field.query_changed("b").into_job().unwrap());
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(runner.try_recv().is_none());
    assert!(!field.container().is_visible());
    assert!(field.container().notice().is_none());
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = RemoteSource::new(&format!("http://{addr}/")).unwrap();
    let err = remote.filter("x").await.unwrap_err();
    assert_eq!(err.category(), "Request Error");
}
