use mapping_schema::{SchemaError, SchemaFetcher};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Serve `count` requests with a canned response on an ephemeral port.
fn serve(status: &'static str, body: &'static str, count: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        for stream in listener.incoming().take(count) {
            let Ok(mut stream) = stream else { continue };
            read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    format!("http://{addr}/openapi.json")
}

fn read_request(stream: &mut TcpStream) {
    let mut buf = [0u8; 4096];
    let mut seen = Vec::new();
    while let Ok(n) = stream.read(&mut buf) {
        if n == 0 {
            break;
        }
        seen.extend_from_slice(&buf[..n]);
        if seen.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/openapi.json")
}

#[tokio::test]
async fn fetch_builds_index_from_remote_document() {
    let url = serve(
        "200 OK",
        r#"{"openapi":"3.1.0","paths":{"/x/y":{"get":{},"post":{}},"/z":{"delete":{}}}}"#,
        1,
    );

    let index = SchemaFetcher::default().fetch(&url).await.expect("fetch");

    assert_eq!(index.len(), 2);
    let methods: Vec<&str> = index
        .methods_for("/x/y")
        .expect("path")
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(methods, vec!["GET", "POST"]);
}

#[tokio::test]
async fn non_success_status_is_fatal() {
    let url = serve("503 Service Unavailable", r#"{"detail":"down"}"#, 1);

    let fetcher = SchemaFetcher {
        retries: 3,
        ..SchemaFetcher::default()
    };
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(
        matches!(err, SchemaError::Status { status: 503, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn non_json_body_is_invalid() {
    let url = serve("200 OK", "<html>login</html>", 1);
    let err = SchemaFetcher::default().fetch(&url).await.unwrap_err();
    assert!(matches!(err, SchemaError::InvalidBody { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_host_fails_after_retries() {
    let fetcher = SchemaFetcher {
        timeout: Duration::from_secs(2),
        retries: 2,
        backoff: Duration::from_millis(1),
    };
    let err = fetcher.fetch(&closed_port_url()).await.unwrap_err();
    assert!(matches!(err, SchemaError::Transport { .. }), "{err:?}");
}
