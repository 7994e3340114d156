//! Google Drive JSON document client
//!
//! Reads and writes a single JSON document in the user's Drive through the
//! v3 REST API: locate it by name, create it, overwrite its content and
//! download it.

use bridge_traits::crypto::RandomSource;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::config::{DriveEndpoints, DriveSettings};
use core_runtime::http_error::describe_failure;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{GoogleDriveError, Result};
use crate::multipart::MultipartRelated;
use crate::types::{FileMetadata, FilesListResponse, RemoteFileRef, JSON_MIME_TYPE};

/// Fields requested from files.list
const LIST_FIELDS: &str = "files(id,name,modifiedTime,size)";

/// Fields requested from uploads
const UPLOAD_FIELDS: &str = "id,name,modifiedTime";

/// Escape a file name for a Drive query string literal.
///
/// Only single quotes are escaped (`'` becomes `\'`); other characters are
/// passed through.
pub fn escape_query_literal(name: &str) -> String {
    name.replace('\'', "\\'")
}

/// Which path [`GoogleDriveJsonClient::save_json_file`] took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(RemoteFileRef),
    Updated(RemoteFileRef),
}

impl SaveOutcome {
    pub fn file(&self) -> &RemoteFileRef {
        match self {
            SaveOutcome::Created(file) | SaveOutcome::Updated(file) => file,
        }
    }

    pub fn into_file(self) -> RemoteFileRef {
        match self {
            SaveOutcome::Created(file) | SaveOutcome::Updated(file) => file,
        }
    }
}

/// Google Drive API client for one JSON document
///
/// Stateless apart from the transport, the random source used for multipart
/// boundaries, and the endpoints. The access token is passed to every call.
///
/// Each call issues exactly one request: no retries, no token refresh.
/// Calling [`find_file_by_name`](Self::find_file_by_name) and then
/// [`create_json_file`](Self::create_json_file) is not atomic: two clients
/// racing on the same name can both create a file.
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveJsonClient;
///
/// let drive = GoogleDriveJsonClient::new(http_client, random);
/// match drive.find_file_by_name(&access_token, "data.json").await? {
///     Some(file) => {
///         let text = drive.download_json_text(&access_token, &file.id).await?;
///     }
///     None => {
///         drive.create_json_file(&access_token, "data.json", "{}").await?;
///     }
/// }
/// ```
#[derive(Clone)]
pub struct GoogleDriveJsonClient {
    http_client: Arc<dyn HttpClient>,
    random: Arc<dyn RandomSource>,
    endpoints: DriveEndpoints,
}

impl GoogleDriveJsonClient {
    /// Create a client against the production Drive endpoints.
    pub fn new(http_client: Arc<dyn HttpClient>, random: Arc<dyn RandomSource>) -> Self {
        Self::with_endpoints(http_client, random, DriveEndpoints::default())
    }

    pub fn with_endpoints(
        http_client: Arc<dyn HttpClient>,
        random: Arc<dyn RandomSource>,
        endpoints: DriveEndpoints,
    ) -> Self {
        Self {
            http_client,
            random,
            endpoints,
        }
    }

    pub fn from_settings(
        http_client: Arc<dyn HttpClient>,
        random: Arc<dyn RandomSource>,
        settings: &DriveSettings,
    ) -> Self {
        Self::with_endpoints(http_client, random, settings.endpoints.clone())
    }

    pub fn endpoints(&self) -> &DriveEndpoints {
        &self.endpoints
    }

    /// Find the first non-trashed file whose name equals `name`.
    ///
    /// Returns `Ok(None)` when nothing matches. When several files share the
    /// name, which one is returned is up to Drive's default ordering.
    #[instrument(skip(self, access_token), fields(name = %name))]
    pub async fn find_file_by_name(
        &self,
        access_token: &str,
        name: &str,
    ) -> Result<Option<RemoteFileRef>> {
        let query = format!("name='{}' and trashed=false", escape_query_literal(name));

        let mut url = self.endpoints.files.clone();
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("fields", LIST_FIELDS)
            .append_pair("pageSize", "1");

        let request = HttpRequest::new(HttpMethod::Get, url).bearer_token(access_token);
        let response = self.send(request).await?;
        self.ensure_success(&response, "Failed to find Drive file", GoogleDriveError::Lookup)?;

        let list: FilesListResponse = parse_json(&response)?;
        let file = list.files.into_iter().next();

        debug!(found = file.is_some(), "Drive file lookup finished");

        Ok(file)
    }

    /// Create a new JSON file named `name` with `json_text` as its content.
    ///
    /// Always creates: an existing file with the same name is left alone and
    /// a second one is added.
    #[instrument(skip(self, access_token, json_text), fields(name = %name, bytes = json_text.len()))]
    pub async fn create_json_file(
        &self,
        access_token: &str,
        name: &str,
        json_text: &str,
    ) -> Result<RemoteFileRef> {
        let metadata = serde_json::to_string(&FileMetadata::json(name))
            .map_err(|e| GoogleDriveError::InvalidResponse(e.to_string()))?;
        let multipart = MultipartRelated::new(self.random.as_ref(), &metadata, json_text)?;

        let mut url = self.endpoints.upload.clone();
        url.query_pairs_mut()
            .append_pair("uploadType", "multipart")
            .append_pair("fields", UPLOAD_FIELDS);

        let request = HttpRequest::new(HttpMethod::Post, url)
            .bearer_token(access_token)
            .header("Content-Type", multipart.content_type())
            .body(multipart.into_body());

        let response = self.send(request).await?;
        self.ensure_success(&response, "Failed to create Drive file", GoogleDriveError::Create)?;

        let file: RemoteFileRef = parse_json(&response)?;
        info!(file_id = %file.id, "Created Drive file");

        Ok(file)
    }

    /// Replace the content of `file_id` with `json_text`.
    ///
    /// Metadata (including the name) is unchanged.
    #[instrument(skip(self, access_token, json_text), fields(file_id = %file_id, bytes = json_text.len()))]
    pub async fn update_json_file(
        &self,
        access_token: &str,
        file_id: &str,
        json_text: &str,
    ) -> Result<RemoteFileRef> {
        let mut url = file_url(&self.endpoints.upload, file_id)?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("fields", UPLOAD_FIELDS);

        let request = HttpRequest::new(HttpMethod::Patch, url)
            .bearer_token(access_token)
            .header("Content-Type", JSON_MIME_TYPE)
            .body(json_text.to_string());

        let response = self.send(request).await?;
        self.ensure_success(&response, "Failed to update Drive file", GoogleDriveError::Update)?;

        let file: RemoteFileRef = parse_json(&response)?;
        info!(file_id = %file.id, "Updated Drive file");

        Ok(file)
    }

    /// Download the raw content of `file_id`.
    ///
    /// The body is returned as-is; it is not parsed or validated as JSON.
    #[instrument(skip(self, access_token), fields(file_id = %file_id))]
    pub async fn download_json_text(&self, access_token: &str, file_id: &str) -> Result<String> {
        let mut url = file_url(&self.endpoints.files, file_id)?;
        url.query_pairs_mut().append_pair("alt", "media");

        let request = HttpRequest::new(HttpMethod::Get, url).bearer_token(access_token);
        let response = self.send(request).await?;
        self.ensure_success(
            &response,
            "Failed to download Drive file",
            GoogleDriveError::Download,
        )?;

        let text = response
            .text()
            .map_err(|e| GoogleDriveError::InvalidResponse(e.to_string()))?;

        debug!(bytes = text.len(), "Downloaded Drive file");

        Ok(text)
    }

    /// Write `json_text` to the file named `name`, creating it if needed.
    ///
    /// Looks the file up first, then updates it or creates it. The two steps
    /// are separate requests, so a concurrent writer can still produce a
    /// duplicate.
    #[instrument(skip(self, access_token, json_text), fields(name = %name))]
    pub async fn save_json_file(
        &self,
        access_token: &str,
        name: &str,
        json_text: &str,
    ) -> Result<SaveOutcome> {
        match self.find_file_by_name(access_token, name).await? {
            Some(existing) => self
                .update_json_file(access_token, &existing.id, json_text)
                .await
                .map(SaveOutcome::Updated),
            None => self
                .create_json_file(access_token, name, json_text)
                .await
                .map(SaveOutcome::Created),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.http_client
            .execute(request)
            .await
            .map_err(|e| GoogleDriveError::Network(e.to_string()))
    }

    fn ensure_success(
        &self,
        response: &HttpResponse,
        prefix: &str,
        to_error: fn(String) -> GoogleDriveError,
    ) -> Result<()> {
        if response.is_success() {
            return Ok(());
        }

        let message = describe_failure(response, prefix);
        warn!(status = response.status, error = %message, "Drive request failed");
        Err(to_error(message))
    }
}

fn file_url(base: &Url, file_id: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GoogleDriveError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .push(file_id);
    Ok(url)
}

fn parse_json<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    response
        .json()
        .map_err(|e| GoogleDriveError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_desktop::OsRandom;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn client(mock_http: MockHttpClient) -> GoogleDriveJsonClient {
        GoogleDriveJsonClient::new(Arc::new(mock_http), Arc::new(OsRandom))
    }

    fn query_of(request: &HttpRequest) -> HashMap<String, String> {
        Url::parse(&request.url)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
        request.headers.get(name).map(String::as_str)
    }

    #[test]
    fn test_escape_query_literal() {
        assert_eq!(escape_query_literal("O'Brien.json"), "O\\'Brien.json");
        assert_eq!(escape_query_literal("plain.json"), "plain.json");
        assert_eq!(escape_query_literal("''"), "\\'\\'");
    }

    #[test]
    fn test_file_url_appends_segment() {
        let base = Url::parse("https://www.googleapis.com/drive/v3/files").unwrap();
        assert_eq!(
            file_url(&base, "f1").unwrap().as_str(),
            "https://www.googleapis.com/drive/v3/files/f1"
        );

        let trailing = Url::parse("http://127.0.0.1:8080/files/").unwrap();
        assert_eq!(
            file_url(&trailing, "f1").unwrap().as_str(),
            "http://127.0.0.1:8080/files/f1"
        );
    }

    #[tokio::test]
    async fn test_find_file_query_escapes_quotes() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|request| {
            assert_eq!(request.method, HttpMethod::Get);
            assert!(request
                .url
                .starts_with("https://www.googleapis.com/drive/v3/files?"));
            assert_eq!(header(&request, "Authorization"), Some("Bearer tok"));

            let query = query_of(&request);
            assert_eq!(query["q"], "name='O\\'Brien.json' and trashed=false");
            assert_eq!(query["fields"], "files(id,name,modifiedTime,size)");
            assert_eq!(query["pageSize"], "1");

            Ok(HttpResponse::new(200, r#"{"files":[]}"#))
        });

        let result = client(mock_http)
            .find_file_by_name("tok", "O'Brien.json")
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_find_file_returns_first_match() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse::new(
                200,
                r#"{"files":[
                    {"id":"a","name":"data.json","modifiedTime":"2024-01-01T00:00:00.000Z","size":"12"},
                    {"id":"b","name":"data.json"}
                ]}"#,
            ))
        });

        let file = client(mock_http)
            .find_file_by_name("tok", "data.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.id, "a");
        assert_eq!(file.size(), Some(12));
    }

    #[tokio::test]
    async fn test_find_file_error_message() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse::new(
                403,
                r#"{"error":{"code":403,"message":"Insufficient Permission"}}"#,
            ))
        });

        let err = client(mock_http)
            .find_file_by_name("tok", "data.json")
            .await
            .unwrap_err();
        assert!(matches!(err, GoogleDriveError::Lookup(_)));
        assert_eq!(
            err.to_string(),
            "Failed to find Drive file: Insufficient Permission"
        );
    }

    #[tokio::test]
    async fn test_create_json_file_multipart_body() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|request| {
            assert_eq!(request.method, HttpMethod::Post);
            assert!(request
                .url
                .starts_with("https://www.googleapis.com/upload/drive/v3/files?"));
            assert_eq!(header(&request, "Authorization"), Some("Bearer tok"));

            let query = query_of(&request);
            assert_eq!(query["uploadType"], "multipart");
            assert_eq!(query["fields"], "id,name,modifiedTime");

            let content_type = header(&request, "Content-Type").unwrap();
            let boundary = content_type
                .strip_prefix("multipart/related; boundary=")
                .unwrap();
            assert!(!boundary.is_empty());

            let expected = format!(
                "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n\
                 {{\"name\":\"data.json\",\"mimeType\":\"application/json\"}}\r\n\
                 --{b}\r\nContent-Type: application/json\r\n\r\n\
                 {{\"a\":1}}\r\n--{b}--",
                b = boundary
            );
            assert_eq!(request.body_text().unwrap(), expected);

            Ok(HttpResponse::new(
                200,
                r#"{"id":"new-id","name":"data.json","modifiedTime":"2024-01-01T00:00:00.000Z"}"#,
            ))
        });

        let file = client(mock_http)
            .create_json_file("tok", "data.json", r#"{"a":1}"#)
            .await
            .unwrap();
        assert_eq!(file.id, "new-id");
        assert_eq!(file.name, "data.json");
    }

    #[tokio::test]
    async fn test_create_json_file_error_message() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(500, "")));

        let err = client(mock_http)
            .create_json_file("tok", "data.json", "{}")
            .await
            .unwrap_err();
        assert!(matches!(err, GoogleDriveError::Create(_)));
        assert_eq!(err.to_string(), "Failed to create Drive file");
    }

    #[tokio::test]
    async fn test_update_json_file_request() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|request| {
            assert_eq!(request.method, HttpMethod::Patch);
            let url = Url::parse(&request.url).unwrap();
            assert_eq!(url.path(), "/upload/drive/v3/files/f1");

            let query = query_of(&request);
            assert_eq!(query["uploadType"], "media");
            assert_eq!(query["fields"], "id,name,modifiedTime");
            assert_eq!(header(&request, "Content-Type"), Some("application/json"));
            assert_eq!(header(&request, "Authorization"), Some("Bearer tok"));
            assert_eq!(request.body_text().unwrap(), r#"{"b":2}"#);

            Ok(HttpResponse::new(
                200,
                r#"{"id":"f1","name":"data.json","modifiedTime":"2024-02-01T00:00:00.000Z"}"#,
            ))
        });

        let file = client(mock_http)
            .update_json_file("tok", "f1", r#"{"b":2}"#)
            .await
            .unwrap();
        assert_eq!(file.id, "f1");
        assert!(file.modified_at().is_some());
    }

    #[tokio::test]
    async fn test_update_json_file_plain_text_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(404, "Not Found")));

        let err = client(mock_http)
            .update_json_file("tok", "missing", "{}")
            .await
            .unwrap_err();
        assert!(matches!(err, GoogleDriveError::Update(_)));
        assert_eq!(err.to_string(), "Failed to update Drive file: Not Found");
    }

    #[tokio::test]
    async fn test_download_json_text_verbatim() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|request| {
            assert_eq!(request.method, HttpMethod::Get);
            let url = Url::parse(&request.url).unwrap();
            assert!(url.path().ends_with("/f1"));
            assert_eq!(url.query(), Some("alt=media"));
            assert_eq!(header(&request, "Authorization"), Some("Bearer tok"));

            Ok(HttpResponse::new(200, "not json at all {"))
        });

        let text = client(mock_http)
            .download_json_text("tok", "f1")
            .await
            .unwrap();
        assert_eq!(text, "not json at all {");
    }

    #[tokio::test]
    async fn test_download_unreadable_error_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(500, vec![0xff, 0xfe, 0xfd])));

        let err = client(mock_http)
            .download_json_text("tok", "f1")
            .await
            .unwrap_err();
        assert!(matches!(err, GoogleDriveError::Download(_)));
        assert_eq!(err.to_string(), "Failed to download Drive file");
    }

    #[tokio::test]
    async fn test_network_failure() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Err(BridgeError::OperationFailed(
                "Connection failed: dns error".to_string(),
            ))
        });

        let err = client(mock_http)
            .download_json_text("tok", "f1")
            .await
            .unwrap_err();
        assert!(matches!(err, GoogleDriveError::Network(_)));
    }

    #[tokio::test]
    async fn test_invalid_success_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "<html></html>")));

        let err = client(mock_http)
            .find_file_by_name("tok", "data.json")
            .await
            .unwrap_err();
        assert!(matches!(err, GoogleDriveError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_save_json_file_updates_existing() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = mockall::Sequence::new();

        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|request| {
                assert_eq!(request.method, HttpMethod::Get);
                Ok(HttpResponse::new(
                    200,
                    r#"{"files":[{"id":"f1","name":"data.json"}]}"#,
                ))
            });
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|request| {
                assert_eq!(request.method, HttpMethod::Patch);
                Ok(HttpResponse::new(200, r#"{"id":"f1","name":"data.json"}"#))
            });

        let outcome = client(mock_http)
            .save_json_file("tok", "data.json", "{}")
            .await
            .unwrap();
        assert!(matches!(outcome, SaveOutcome::Updated(_)));
        assert_eq!(outcome.file().id, "f1");
    }

    #[tokio::test]
    async fn test_save_json_file_creates_missing() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = mockall::Sequence::new();

        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"files":[]}"#)));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|request| {
                assert_eq!(request.method, HttpMethod::Post);
                Ok(HttpResponse::new(200, r#"{"id":"new","name":"data.json"}"#))
            });

        let outcome = client(mock_http)
            .save_json_file("tok", "data.json", "{}")
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Created(outcome.file().clone()));
        assert_eq!(outcome.into_file().id, "new");
    }
}
