use std::net::SocketAddr;

use axum::Router;
use axum::extract::{Json, Multipart};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use serde_json::{Value, json};
use tako_core::client::{
    ClientError,
    DataService,
    SourceIndex,
    TakoClient,
    TakoClientConfig,
    VisualizeTarget,
};
use tako_core::dataset::TakoDataFormatDataset;

const API_KEY: &str = "test-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        == Some(API_KEY)
}

async fn knowledge_search(
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({ "request": body, "outputs": { "knowledge_cards": [] } })))
}

async fn upload(headers: HeaderMap, mut multipart: Multipart) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        return Ok(Json(json!({ "id": format!("{file_name}:{content}") })));
    }
    Err(StatusCode::BAD_REQUEST)
}

async fn visualize(
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({ "request": body })))
}

async fn spawn_fake_tako() -> SocketAddr {
    let app = Router::new()
        .route("/api/v1/knowledge_search", post(knowledge_search))
        .route("/api/v1/beta/files", post(upload))
        .route("/api/v1/beta/visualize", post(visualize));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake tako listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake tako server");
    });
    addr
}

fn client_for(addr: SocketAddr, api_key: &str) -> TakoClient {
    let config = TakoClientConfig::new(api_key).with_base_url(format!("http://{addr}/"));
    TakoClient::new(config).expect("client should build")
}

#[tokio::test]
async fn search_posts_text_and_source_indexes() {
    let addr = spawn_fake_tako().await;
    let client = client_for(addr, API_KEY);

    let response = client
        .search("Revenue of Tesla", &[SourceIndex::Tako, SourceIndex::Web])
        .await
        .expect("search should succeed");

    assert_eq!(response["request"]["inputs"]["text"], "Revenue of Tesla");
    assert_eq!(response["request"]["source_indexes"], json!(["tako", "web"]));
}

#[tokio::test]
async fn upload_sends_multipart_file_and_reads_id_alias() {
    let addr = spawn_fake_tako().await;
    let client = client_for(addr, API_KEY);
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("temp_abc_a.txt");
    std::fs::write(&path, b"hello").expect("write upload fixture");

    let file_id = client.upload_file(&path).await.expect("upload should succeed");

    assert_eq!(file_id, "temp_abc_a.txt:hello");
}

#[tokio::test]
async fn visualize_wraps_file_id_and_dataset() {
    let addr = spawn_fake_tako().await;
    let client = client_for(addr, API_KEY);

    let by_file = client
        .visualize(&VisualizeTarget::File("file-1".to_string()))
        .await
        .expect("visualize file should succeed");
    assert_eq!(by_file["request"], json!({ "file_id": "file-1" }));

    let Value::Object(map) = json!({
        "title": "Cases",
        "variables": [{ "name": "cases", "type": "number" }],
        "rows": [{ "cases": 10 }]
    }) else {
        panic!("fixture should be an object");
    };
    let dataset = TakoDataFormatDataset::from_map(map).expect("fixture should validate");
    let by_dataset = client
        .visualize(&VisualizeTarget::Dataset(dataset))
        .await
        .expect("visualize dataset should succeed");
    assert_eq!(
        by_dataset["request"]["tako_formatted_dataset"]["title"],
        "Cases"
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let addr = spawn_fake_tako().await;
    let client = client_for(addr, "wrong-key");

    let err = client
        .search("anything", &[SourceIndex::Tako])
        .await
        .expect_err("unauthorized search should fail");

    assert!(matches!(err, ClientError::Status { status: 401, .. }));
}

#[tokio::test]
async fn missing_upload_file_is_io_error() {
    let addr = spawn_fake_tako().await;
    let client = client_for(addr, API_KEY);
    let dir = tempfile::tempdir().expect("tempdir");

    let err = client
        .upload_file(&dir.path().join("missing.bin"))
        .await
        .expect_err("missing file should fail");

    assert!(matches!(err, ClientError::Io(_)));
}
