//! Integration tests for the remote asset fetcher

#![cfg(feature = "net")]

use carimg::fetch::RemoteAssetFetcher;
use carimg::{AssetSource, ToolConfig};
use std::sync::{Arc, Mutex};
use tiny_http::{Response, Server};

/// Serve every request with a small fake JPEG body and record the path.
fn start_photo_server(seen: Arc<Mutex<Vec<String>>>) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            seen.lock().unwrap().push(request.url().to_string());
            let body = format!("jpeg:{}", request.url());
            let _ = request.respond(Response::from_data(body.into_bytes()));
        }
    });
    format!("http://{}", addr)
}

/// A URL on a port nothing listens on.
fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/photo-b", port)
}

#[test]
fn test_batch_continues_past_unreachable_source() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let base = start_photo_server(seen.clone());
    let dir = tempfile::tempdir().unwrap();

    let config = ToolConfig {
        output_dir: dir.path().to_path_buf(),
        fetch_timeout_ms: 5000,
        ..Default::default()
    };
    let fetcher = RemoteAssetFetcher::new(&config).expect("Failed to create fetcher");
    let sources = vec![
        AssetSource::new("a.jpg", &format!("{}/photo-a", base)),
        AssetSource::new("b.jpg", &unreachable_url()),
        AssetSource::new("c.jpg", &format!("{}/photo-c", base)),
    ];

    let mut report = Vec::new();
    let summary = fetcher.fetch_all(&sources, &mut report).expect("batch must not fail");

    assert_eq!(summary.counts(), (2, 3));
    let failed: Vec<_> = summary.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, vec!["b.jpg"]);

    // the third item was attempted after the second failed
    assert_eq!(*seen.lock().unwrap(), vec!["/photo-a".to_string(), "/photo-c".to_string()]);
    assert_eq!(std::fs::read_to_string(dir.path().join("c.jpg")).unwrap(), "jpeg:/photo-c");

    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("✗ Error downloading b.jpg"));
    assert!(report.contains("2/3 images downloaded"));
}

#[test]
fn test_http_errors_count_as_failures() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = if request.url() == "/missing" {
                Response::from_string("Not Found").with_status_code(404)
            } else {
                Response::from_string("ok")
            };
            let _ = request.respond(response);
        }
    });

    let dir = tempfile::tempdir().unwrap();
    let config = ToolConfig {
        output_dir: dir.path().join("nested/photos"),
        ..Default::default()
    };
    let fetcher = RemoteAssetFetcher::new(&config).unwrap();
    let sources = vec![
        AssetSource::new("missing.jpg", &format!("http://{}/missing", addr)),
        AssetSource::new("present.jpg", &format!("http://{}/present", addr)),
    ];

    let summary = fetcher.fetch_all(&sources, &mut std::io::sink()).unwrap();
    assert_eq!(summary.counts(), (1, 2));
    assert_eq!(summary.outcomes[0].detail, "Network error: HTTP 404");
    assert!(dir.path().join("nested/photos/present.jpg").exists());
}
