use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use search_core::corpus::write_corpus;
use search_core::Record;
use serde_json::Value;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_app() -> Router {
    let dir = tempdir().unwrap();
    let path = dir.path().join("raw_data.txt");
    write_corpus(
        &path,
        vec![
            Record::new("Collections", "https://docs/Collections.html", "Utility methods for rust collections."),
            Record::new("Rust", "https://docs/Rust.html", "Rust is great. rust systems programming."),
        ],
    )
    .unwrap();
    // a malformed line must not prevent startup
    std::fs::write(&path, format!("{}broken line\n", std::fs::read_to_string(&path).unwrap())).unwrap();
    let engine = server::load_engine(path.to_str().unwrap()).unwrap();
    server::build_app(engine)
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (status, json) = call(build_app(), "/search?q=rust").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    // 10 for the title + 2 body hits beats a single body hit
    assert_eq!(arr[0]["title"], "Rust");
    assert_eq!(arr[0]["showUrl"], "https://docs/Rust.html");
    assert_eq!(arr[0]["clickUrl"], "https://docs/Rust.html");
    assert_eq!(arr[0]["desc"], "Rust is great. rust systems programming.");
    assert_eq!(arr[1]["title"], "Collections");
    assert_eq!(json["total_hits"], 2);
}

#[tokio::test]
async fn unknown_term_is_empty_not_error() {
    let (status, json) = call(build_app(), "/search?q=zzqxnotaword").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn doc_lookup_and_out_of_range() {
    let (status, json) = call(build_app(), "/doc/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Rust");

    let (status, _) = call(build_app(), "/doc/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
