//! End-to-end upload pipeline tests against an in-process HTTP server.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use image::{ImageFormat, Rgba, RgbaImage};
use scansheet_client::ApiClient;
use scansheet_core::EncryptionService;
use scansheet_storage::{ExportCatalog, FileIndex, ScopedStore};
use serde_json::json;
use std::io::Cursor;
use std::time::Duration;

const TEST_KEY: &[u8; 32] = b"01234567890123456789012345678901";
const TEST_TOKEN: &str = "test-auth-token";

fn crypto() -> EncryptionService {
    EncryptionService::from_key_bytes(TEST_KEY).unwrap()
}

fn png_image() -> Vec<u8> {
    let mut img = RgbaImage::new(8, 8);
    for pixel in img.pixels_mut() {
        *pixel = Rgba([10, 120, 200, 255]);
    }
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Encrypt a table response the way the server does: a JSON array of
/// JSON-encoded record strings.
fn sealed_table(records: &[serde_json::Value]) -> String {
    let encoded: Vec<String> = records.iter().map(|r| r.to_string()).collect();
    let raw = serde_json::to_vec(&encoded).unwrap();
    crypto().seal_to_base64(&raw).unwrap()
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: String) -> ApiClient {
    ApiClient::new(
        base_url,
        TEST_TOKEN.to_string(),
        crypto(),
        Duration::from_secs(10),
    )
    .unwrap()
}

#[derive(Clone)]
struct CannedResponse {
    status: StatusCode,
    body: serde_json::Value,
}

async fn canned_handler(
    State(canned): State<CannedResponse>,
    headers: HeaderMap,
) -> impl IntoResponse {
    // Auth is a fixed pre-shared token sent verbatim.
    let authorized = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == TEST_TOKEN)
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (canned.status, Json(canned.body))
}

async fn spawn_canned(status: StatusCode, body: serde_json::Value) -> String {
    let router = Router::new()
        .route("/process-image", post(canned_handler))
        .with_state(CannedResponse { status, body });
    spawn_server(router).await
}

#[tokio::test]
async fn successful_submission_writes_csv() {
    let records = [
        json!({"title": "page1", "content": {"age": 33, "name": "Ana"}}),
        json!({"title": "page2", "content": {"city": "Recife"}}),
    ];
    let base_url = spawn_canned(StatusCode::OK, json!({"table": sealed_table(&records)})).await;

    let dir = tempfile::tempdir().unwrap();
    let index = FileIndex::new(dir.path());
    let store = ScopedStore::new(index.clone());

    let outcome = client(base_url)
        .submit(vec![png_image(), png_image()], "outros", &store)
        .await;

    let info = match outcome {
        scansheet_core::UploadOutcome::Succeeded(info) => info,
        other => panic!("expected success, got {:?}", other),
    };
    assert!(info.name.starts_with("scansheet_data_"));
    assert!(info.name.ends_with(".csv"));

    let content = tokio::fs::read_to_string(
        dir.path().join("Download/ScanSheet").join(&info.name),
    )
    .await
    .unwrap();
    assert_eq!(content, "age,name,city\n33,Ana,Recife");

    // The export is discoverable through the catalog's primary query.
    let files = ExportCatalog::new(index).list().await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, info.name);
}

#[tokio::test]
async fn unauthorized_status_maps_to_credentials_message() {
    let base_url = spawn_canned(StatusCode::OK, json!({})).await;

    let dir = tempfile::tempdir().unwrap();
    let store = ScopedStore::new(FileIndex::new(dir.path()));

    let bad_client = ApiClient::new(
        base_url,
        "wrong-token".to_string(),
        crypto(),
        Duration::from_secs(10),
    )
    .unwrap();

    let outcome = bad_client.submit(vec![png_image()], "outros", &store).await;
    assert_eq!(
        outcome.failure_message(),
        Some("Unauthorized. Check the credentials")
    );
}

#[tokio::test]
async fn server_errors_map_to_internal_message() {
    let base_url = spawn_canned(StatusCode::SERVICE_UNAVAILABLE, json!({})).await;

    let dir = tempfile::tempdir().unwrap();
    let store = ScopedStore::new(FileIndex::new(dir.path()));

    let outcome = client(base_url).submit(vec![png_image()], "outros", &store).await;
    assert_eq!(outcome.failure_message(), Some("Internal server error"));
}

#[tokio::test]
async fn missing_table_field_is_a_protocol_failure() {
    let base_url = spawn_canned(StatusCode::OK, json!({"status": "done"})).await;

    let dir = tempfile::tempdir().unwrap();
    let store = ScopedStore::new(FileIndex::new(dir.path()));

    let outcome = client(base_url).submit(vec![png_image()], "outros", &store).await;
    assert_eq!(
        outcome.failure_message(),
        Some("Server response is in an invalid format")
    );
}

#[tokio::test]
async fn undecryptable_table_is_a_decryption_failure() {
    use base64::Engine as _;
    let garbage = base64::engine::general_purpose::STANDARD.encode([0u8; 40]);
    let base_url = spawn_canned(StatusCode::OK, json!({"table": garbage})).await;

    let dir = tempfile::tempdir().unwrap();
    let store = ScopedStore::new(FileIndex::new(dir.path()));

    let outcome = client(base_url).submit(vec![png_image()], "outros", &store).await;
    assert_eq!(
        outcome.failure_message(),
        Some("Failed to decrypt data from the server")
    );
}

#[tokio::test]
async fn empty_extraction_fails_and_writes_no_file() {
    let records = [json!({"title": "no content at all"})];
    let base_url = spawn_canned(StatusCode::OK, json!({"table": sealed_table(&records)})).await;

    let dir = tempfile::tempdir().unwrap();
    let index = FileIndex::new(dir.path());
    let store = ScopedStore::new(index.clone());

    let outcome = client(base_url).submit(vec![png_image()], "outros", &store).await;
    assert_eq!(
        outcome.failure_message(),
        Some("No data could be extracted from the response")
    );

    let files = ExportCatalog::new(index).list().await.unwrap();
    assert!(files.is_empty());
    assert!(!dir.path().join("Download/ScanSheet").exists());
}

#[tokio::test]
async fn undecodable_image_fails_fast_without_network() {
    // Base URL points nowhere; the pipeline must fail before any request.
    let dir = tempfile::tempdir().unwrap();
    let store = ScopedStore::new(FileIndex::new(dir.path()));

    let outcome = client("http://127.0.0.1:9".to_string())
        .submit(vec![png_image(), b"not an image".to_vec()], "outros", &store)
        .await;

    assert_eq!(outcome.failure_message(), Some("Failed to process the images"));
}
