//! Media upload (v1.1 chunked protocol) and guarded remote fetch.

use super::{Host, RequestBody, XClient};
use crate::error::{Result, XError};
use crate::security::validate_url;
use reqwest::{multipart, redirect, Method};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const UPLOAD_PATH: &str = "/1.1/media/upload.json";
const METADATA_PATH: &str = "/1.1/media/metadata/create.json";

/// Bytes per APPEND segment.
pub const CHUNK_SIZE: usize = 4 * 1024 * 1024;
const MAX_STATUS_POLLS: usize = 60;
const MAX_REDIRECTS: usize = 10;
/// Largest upload the API accepts (long-form video).
pub const MAX_MEDIA_BYTES: u64 = 512 * 1024 * 1024;

/// Upload category the API expects for a MIME type.
pub fn media_category(mime_type: &str) -> &'static str {
    let mime = mime_type.to_ascii_lowercase();
    if mime == "image/gif" {
        "tweet_gif"
    } else if mime.starts_with("video/") {
        "tweet_video"
    } else {
        "tweet_image"
    }
}

fn command(name: &str, media_id: &str) -> Vec<(String, String)> {
    vec![
        ("command".to_string(), name.to_string()),
        ("media_id".to_string(), media_id.to_string()),
    ]
}

fn media_id_of(body: &Value) -> Result<String> {
    body.get("media_id_string")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| body.get("media_id").and_then(Value::as_u64).map(|id| id.to_string()))
        .ok_or_else(|| XError::MediaProcessing("upload response carried no media id".to_string()))
}

impl XClient {
    async fn upload_command(&self, method: Method, query: Vec<(String, String)>) -> Result<Value> {
        self.send(method, Host::Upload, UPLOAD_PATH, &query, RequestBody::Empty)
            .await
            .map(|r| r.body)
    }

    /// Upload `bytes` and return the media id once the API accepts it.
    pub async fn upload_media(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        let init = self
            .upload_command(
                Method::POST,
                vec![
                    ("command".to_string(), "INIT".to_string()),
                    ("total_bytes".to_string(), bytes.len().to_string()),
                    ("media_type".to_string(), mime_type.to_string()),
                    ("media_category".to_string(), media_category(mime_type).to_string()),
                ],
            )
            .await?;
        let media_id = media_id_of(&init)?;
        debug!(media_id = %media_id, total_bytes = bytes.len(), "Media upload initialised");

        for (index, chunk) in bytes.chunks(CHUNK_SIZE).enumerate() {
            let mut query = command("APPEND", &media_id);
            query.push(("segment_index".to_string(), index.to_string()));

            let form = multipart::Form::new().part(
                "media",
                multipart::Part::bytes(chunk.to_vec()).file_name("media"),
            );
            self.send(
                Method::POST,
                Host::Upload,
                UPLOAD_PATH,
                &query,
                RequestBody::Multipart(form),
            )
            .await?;
        }

        let finalized = self
            .upload_command(Method::POST, command("FINALIZE", &media_id))
            .await?;
        self.await_processing(&media_id, &finalized).await?;

        Ok(media_id)
    }

    /// Poll STATUS until processing leaves `pending`/`in_progress`.
    async fn await_processing(&self, media_id: &str, finalized: &Value) -> Result<()> {
        let mut info = finalized.get("processing_info").cloned();

        for _ in 0..MAX_STATUS_POLLS {
            let Some(current) = info.take() else {
                return Ok(());
            };

            match current.get("state").and_then(Value::as_str) {
                Some("pending") | Some("in_progress") => {}
                Some("failed") => {
                    let reason = current
                        .pointer("/error/message")
                        .and_then(Value::as_str)
                        .unwrap_or("processing failed");
                    return Err(XError::MediaProcessing(reason.to_string()));
                }
                _ => return Ok(()),
            }

            let wait = current
                .get("check_after_secs")
                .and_then(Value::as_u64)
                .unwrap_or(1);
            tokio::time::sleep(Duration::from_secs(wait)).await;

            let status = self
                .upload_command(Method::GET, command("STATUS", media_id))
                .await?;
            info = status.get("processing_info").cloned();
        }

        Err(XError::MediaProcessing(format!(
            "media {} still processing after {} status checks",
            media_id, MAX_STATUS_POLLS
        )))
    }

    /// Attach alt text to an uploaded media id.
    pub async fn create_media_metadata(&self, media_id: &str, alt_text: &str) -> Result<()> {
        let body = json!({ "media_id": media_id, "alt_text": { "text": alt_text } });
        self.send(
            Method::POST,
            Host::Upload,
            METADATA_PATH,
            &[],
            RequestBody::Json(body),
        )
        .await?;
        Ok(())
    }
}

/// HTTP client for pulling media from caller-supplied URLs.
///
/// The URL guard runs on the initial URL and again on every redirect target.
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    http: reqwest::Client,
    guard: fn(&str) -> Result<Url>,
    max_bytes: u64,
}

impl MediaFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_guard(timeout, validate_url)
    }

    fn with_guard(timeout: Duration, guard: fn(&str) -> Result<Url>) -> Result<Self> {
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                return attempt.error(XError::MediaProcessing("too many redirects".to_string()));
            }
            match guard(attempt.url().as_str()) {
                Ok(_) => attempt.follow(),
                Err(e) => {
                    warn!(target = %attempt.url(), "Refused media redirect");
                    attempt.error(e)
                }
            }
        });

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .build()?;

        Ok(Self {
            http,
            guard,
            max_bytes: MAX_MEDIA_BYTES,
        })
    }

    /// Cap the body size accepted by [`fetch`](Self::fetch).
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Fetch the body at `raw_url`. Non-2xx statuses are errors, and so is a
    /// body larger than the configured cap, whether announced or streamed.
    pub async fn fetch(&self, raw_url: &str) -> Result<Vec<u8>> {
        let url = (self.guard)(raw_url)?;

        let mut response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(XError::MediaFetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let too_large = XError::MediaTooLarge {
            limit: self.max_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes)
        {
            return Err(too_large);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use httpmock::prelude::*;

    /// Like `validate_url`, but lets tests reach the loopback mock server.
    fn allow_mock_server(raw: &str) -> Result<Url> {
        let url = Url::parse(raw)?;
        if url.host_str() == Some("127.0.0.1") {
            return Ok(url);
        }
        validate_url(raw)
    }

    fn mock_fetcher() -> MediaFetcher {
        MediaFetcher::with_guard(Duration::from_secs(5), allow_mock_server).unwrap()
    }

    #[test]
    fn test_media_category() {
        assert_eq!(media_category("image/png"), "tweet_image");
        assert_eq!(media_category("image/jpeg"), "tweet_image");
        assert_eq!(media_category("image/GIF"), "tweet_gif");
        assert_eq!(media_category("video/mp4"), "tweet_video");
    }

    #[tokio::test]
    async fn test_image_upload_runs_init_append_finalize() {
        let server = MockServer::start();
        let init = server.mock(|when, then| {
            when.method(POST)
                .path(UPLOAD_PATH)
                .query_param("command", "INIT")
                .query_param("total_bytes", "5")
                .query_param("media_type", "image/png")
                .query_param("media_category", "tweet_image");
            then.status(202).json_body(json!({ "media_id_string": "m1" }));
        });
        let append = server.mock(|when, then| {
            when.method(POST)
                .path(UPLOAD_PATH)
                .query_param("command", "APPEND")
                .query_param("media_id", "m1")
                .query_param("segment_index", "0");
            then.status(204);
        });
        let finalize = server.mock(|when, then| {
            when.method(POST)
                .path(UPLOAD_PATH)
                .query_param("command", "FINALIZE")
                .query_param("media_id", "m1");
            then.status(201).json_body(json!({ "media_id_string": "m1", "size": 5 }));
        });

        let id = test_client(&server)
            .upload_media(b"hello", "image/png")
            .await
            .unwrap();

        assert_eq!(id, "m1");
        init.assert();
        append.assert();
        finalize.assert();
    }

    #[tokio::test]
    async fn test_failed_processing_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(UPLOAD_PATH).query_param("command", "INIT");
            then.status(202).json_body(json!({ "media_id": 77 }));
        });
        server.mock(|when, then| {
            when.method(POST).path(UPLOAD_PATH).query_param("command", "APPEND");
            then.status(204);
        });
        server.mock(|when, then| {
            when.method(POST).path(UPLOAD_PATH).query_param("command", "FINALIZE");
            then.status(201).json_body(json!({
                "media_id_string": "77",
                "processing_info": { "state": "pending", "check_after_secs": 0 }
            }));
        });
        let status = server.mock(|when, then| {
            when.method(GET).path(UPLOAD_PATH).query_param("command", "STATUS");
            then.status(200).json_body(json!({
                "media_id_string": "77",
                "processing_info": {
                    "state": "failed",
                    "error": { "message": "Unsupported codec" }
                }
            }));
        });

        let err = test_client(&server)
            .upload_media(b"clip", "video/mp4")
            .await
            .unwrap_err();

        status.assert();
        assert_eq!(err.to_string(), "Media processing failed: Unsupported codec");
    }

    #[tokio::test]
    async fn test_metadata_sets_alt_text() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(METADATA_PATH).json_body(json!({
                "media_id": "m1",
                "alt_text": { "text": "a cat" }
            }));
            then.status(200);
        });

        test_client(&server)
            .create_media_metadata("m1", "a cat")
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_rejects_internal_url_before_request() {
        let fetcher = MediaFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch("http://169.254.169.254/latest/meta-data")
            .await
            .unwrap_err();
        assert!(matches!(err, XError::PrivateNetwork));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.png");
            then.status(404);
        });

        let err = mock_fetcher()
            .fetch(&server.url("/missing.png"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch media from URL: 404 Not Found");
    }

    #[tokio::test]
    async fn test_fetch_refuses_redirect_to_metadata_host() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/image.png");
            then.status(302)
                .header("location", "http://169.254.169.254/latest/meta-data");
        });

        let err = mock_fetcher()
            .fetch(&server.url("/image.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, XError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cat.gif");
            then.status(200).body("GIF89a");
        });

        let bytes = mock_fetcher().fetch(&server.url("/cat.gif")).await.unwrap();
        assert_eq!(bytes, b"GIF89a");
    }

    #[tokio::test]
    async fn test_fetch_rejects_oversized_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/huge.mp4");
            then.status(200).body("0123456789");
        });

        let err = mock_fetcher()
            .with_max_bytes(4)
            .fetch(&server.url("/huge.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, XError::MediaTooLarge { limit: 4 }));
    }

    #[tokio::test]
    async fn test_fetch_accepts_body_at_limit() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/small.png");
            then.status(200).body("1234");
        });

        let bytes = mock_fetcher()
            .with_max_bytes(4)
            .fetch(&server.url("/small.png"))
            .await
            .unwrap();
        assert_eq!(bytes, b"1234");
    }

    #[test]
    fn test_default_cap_is_largest_upload() {
        let fetcher = MediaFetcher::new(Duration::from_secs(1)).unwrap();
        assert_eq!(fetcher.max_bytes, MAX_MEDIA_BYTES);
    }
}
