//! Drive JSON client integration tests over a real HTTP transport

use bridge_desktop::{OsRandom, ReqwestHttpClient};
use core_runtime::config::DriveEndpoints;
use provider_google_drive::{GoogleDriveError, GoogleDriveJsonClient, SaveOutcome};
use serde_json::json;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn drive_for(server: &MockServer) -> GoogleDriveJsonClient {
    let endpoints = DriveEndpoints {
        files: Url::parse(&format!("{}/drive/v3/files", server.uri())).unwrap(),
        upload: Url::parse(&format!("{}/upload/drive/v3/files", server.uri())).unwrap(),
    };
    let http = ReqwestHttpClient::new().unwrap();
    GoogleDriveJsonClient::with_endpoints(Arc::new(http), Arc::new(OsRandom), endpoints)
}

#[tokio::test]
async fn test_find_then_download() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", "name='data.json' and trashed=false"))
        .and(query_param("pageSize", "1"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{
                "id": "f1",
                "name": "data.json",
                "modifiedTime": "2024-05-01T08:00:00.000Z",
                "size": "17"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/f1"))
        .and(query_param("alt", "media"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"entries": [1, 2]}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let drive = drive_for(&mock_server);
    let file = drive
        .find_file_by_name("tok", "data.json")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(file.id, "f1");
    assert_eq!(file.size(), Some(17));

    let text = drive.download_json_text("tok", &file.id).await.unwrap();
    assert_eq!(text, r#"{"entries": [1, 2]}"#);
}

#[tokio::test]
async fn test_save_creates_when_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "multipart"))
        .and(query_param("fields", "id,name,modifiedTime"))
        .and(body_string_contains(
            r#"{"name":"data.json","mimeType":"application/json"}"#,
        ))
        .and(body_string_contains(r#"{"v":1}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "created",
            "name": "data.json",
            "modifiedTime": "2024-05-01T08:00:00.000Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = drive_for(&mock_server)
        .save_json_file("tok", "data.json", r#"{"v":1}"#)
        .await
        .unwrap();

    assert!(matches!(outcome, SaveOutcome::Created(_)));
    assert_eq!(outcome.file().id, "created");
}

#[tokio::test]
async fn test_save_updates_existing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{ "id": "f1", "name": "data.json" }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/upload/drive/v3/files/f1"))
        .and(query_param("uploadType", "media"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"v":2}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "f1",
            "name": "data.json",
            "modifiedTime": "2024-05-02T08:00:00.000Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = drive_for(&mock_server)
        .save_json_file("tok", "data.json", r#"{"v":2}"#)
        .await
        .unwrap();

    assert!(matches!(outcome, SaveOutcome::Updated(_)));
    assert!(outcome.file().modified_at().is_some());
}

#[tokio::test]
async fn test_expired_token_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "code": 401,
                "message": "Request had invalid authentication credentials.",
                "status": "UNAUTHENTICATED"
            }
        })))
        .mount(&mock_server)
        .await;

    let err = drive_for(&mock_server)
        .find_file_by_name("expired", "data.json")
        .await
        .unwrap_err();

    assert!(matches!(err, GoogleDriveError::Lookup(_)));
    assert_eq!(
        err.to_string(),
        "Failed to find Drive file: Request had invalid authentication credentials."
    );
}

#[tokio::test]
async fn test_download_missing_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = drive_for(&mock_server)
        .download_json_text("tok", "gone")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to download Drive file");
}
