use folio_core::{Collection, ListViewModel, RecordId, RecordStore, RestRecordStore, StoreFailure};
use serde_json::{json, Map, Value};
use std::io::ErrorKind;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

struct CapturedRequest {
    head: String,
    body: String,
}

impl CapturedRequest {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

/// Serves exactly one HTTP response and hands back the request it received.
async fn start_single_response_server(
    status: &str,
    body: &'static str,
) -> Option<(Url, oneshot::Receiver<CapturedRequest>)> {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == ErrorKind::PermissionDenied => return None,
        Err(err) => panic!("failed to bind local test listener: {err}"),
    };
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .into_bytes();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut socket).await;
        let _ = socket.write_all(&response).await;
        let _ = socket.shutdown().await;
        let _ = tx.send(captured);
    });

    Some((Url::parse(&format!("http://{addr}/")).unwrap(), rx))
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let read = socket.read(&mut buf).await.unwrap();
        if read == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..read]);

        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(split) = text.find("\r\n\r\n") {
            let head = text[..split].to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.trim()
                        .eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= split + 4 + content_length {
                let body = String::from_utf8_lossy(&raw[split + 4..split + 4 + content_length])
                    .to_string();
                return CapturedRequest { head, body };
            }
        }
    }
    CapturedRequest {
        head: String::from_utf8_lossy(&raw).to_string(),
        body: String::new(),
    }
}

fn row(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("row must be an object"),
    }
}

#[tokio::test]
async fn fetch_all_reads_every_row_with_auth_headers() {
    let Some((url, request)) = start_single_response_server(
        "200 OK",
        r#"[{"id":1,"techs":"Rust"},{"id":2,"techs":"Go"}]"#,
    )
    .await
    else {
        eprintln!("skipping test: sandbox does not permit local TCP listeners");
        return;
    };

    let store = RestRecordStore::new(url, "anon-key").unwrap();
    let records = store.fetch_all(&Collection::new("techStack")).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].text("techs"), Some("Go"));

    let request = request.await.unwrap();
    assert_eq!(
        request.request_line(),
        "GET /rest/v1/techStack?select=* HTTP/1.1"
    );
    assert_eq!(request.header("apikey").as_deref(), Some("anon-key"));
    assert_eq!(
        request.header("authorization").as_deref(),
        Some("Bearer anon-key")
    );
}

#[tokio::test]
async fn rows_with_unusable_ids_still_load() {
    let Some((url, _request)) = start_single_response_server(
        "200 OK",
        r#"[{"id":1,"title":"A"},{"id":"","title":"B"},{"id":3,"title":"C"}]"#,
    )
    .await
    else {
        eprintln!("skipping test: sandbox does not permit local TCP listeners");
        return;
    };

    let store = RestRecordStore::new(url, "anon-key").unwrap();
    let mut model = ListViewModel::new(store, "projects");
    model.load().await;

    let records = model.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].id(), Some(&RecordId::from(1)));
    assert!(records[1].id().is_none());
    assert_eq!(records[1].text("title"), Some("B"));
    assert_eq!(records[2].id(), Some(&RecordId::from(3)));
    assert!(model.select(3).is_some());
}

#[tokio::test]
async fn fetch_all_maps_error_status() {
    let Some((url, _request)) =
        start_single_response_server("401 Unauthorized", r#"{"message":"Invalid API key"}"#)
            .await
    else {
        eprintln!("skipping test: sandbox does not permit local TCP listeners");
        return;
    };

    let store = RestRecordStore::new(url, "bad-key").unwrap();
    let err = store
        .fetch_all(&Collection::new("projects"))
        .await
        .unwrap_err();

    assert_eq!(err.collection, Collection::new("projects"));
    match err.cause {
        StoreFailure::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected cause: {other}"),
    }
}

#[tokio::test]
async fn fetch_all_rejects_non_array_body() {
    let Some((url, _request)) = start_single_response_server("200 OK", r#"{"id":1}"#).await
    else {
        eprintln!("skipping test: sandbox does not permit local TCP listeners");
        return;
    };

    let store = RestRecordStore::new(url, "anon-key").unwrap();
    let err = store
        .fetch_all(&Collection::new("projects"))
        .await
        .unwrap_err();
    assert!(matches!(err.cause, StoreFailure::Decode(_)));
}

#[tokio::test]
async fn insert_posts_single_row_array() {
    let Some((url, request)) = start_single_response_server("201 Created", "").await else {
        eprintln!("skipping test: sandbox does not permit local TCP listeners");
        return;
    };

    let store = RestRecordStore::new(url, "anon-key").unwrap();
    store
        .insert(
            &Collection::new("contact-form"),
            &row(json!({"name": "Jane", "message": "hi"})),
        )
        .await
        .unwrap();

    let request = request.await.unwrap();
    assert_eq!(
        request.request_line(),
        "POST /rest/v1/contact-form HTTP/1.1"
    );
    assert_eq!(
        request.header("prefer").as_deref(),
        Some("return=minimal")
    );
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, json!([{"name": "Jane", "message": "hi"}]));
}

#[tokio::test]
async fn insert_maps_error_status() {
    let Some((url, _request)) =
        start_single_response_server("400 Bad Request", r#"{"message":"bad row"}"#).await
    else {
        eprintln!("skipping test: sandbox does not permit local TCP listeners");
        return;
    };

    let store = RestRecordStore::new(url, "anon-key").unwrap();
    let err = store
        .insert(&Collection::new("contact-form"), &row(json!({"name": "Jane"})))
        .await
        .unwrap_err();
    assert!(matches!(err.cause, StoreFailure::Status { status: 400, .. }));
}

#[tokio::test]
async fn connection_refused_is_a_transport_failure() {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == ErrorKind::PermissionDenied => {
            eprintln!("skipping test: sandbox does not permit local TCP listeners");
            return;
        }
        Err(err) => panic!("failed to bind: {err}"),
    };
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store =
        RestRecordStore::new(Url::parse(&format!("http://{addr}/")).unwrap(), "anon-key").unwrap();
    let err = store
        .fetch_all(&Collection::new("projects"))
        .await
        .unwrap_err();
    assert!(matches!(err.cause, StoreFailure::Transport(_)));
}
