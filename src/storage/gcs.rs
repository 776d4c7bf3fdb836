//! Google Cloud Storage client over the JSON API

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::{ObjectInfo, ObjectStore, StorageError, TokenProvider};

/// Object store backed by a GCS bucket
pub struct GcsStore {
    http: Client,
    endpoint: String,
    bucket: String,
    tokens: Option<TokenProvider>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    items: Vec<ObjectResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectResource {
    name: String,
    // The API encodes uint64 values as strings
    #[serde(default)]
    size: Option<String>,
    content_type: Option<String>,
    updated: Option<DateTime<Utc>>,
}

impl From<ObjectResource> for ObjectInfo {
    fn from(resource: ObjectResource) -> Self {
        Self {
            size: resource
                .size
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            name: resource.name,
            content_type: resource.content_type,
            updated: resource.updated,
        }
    }
}

impl GcsStore {
    /// Create a client for `bucket`; `tokens` is None for anonymous emulator access
    pub fn new(endpoint: String, bucket: String, tokens: Option<TokenProvider>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
            tokens,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o",
            self.endpoint,
            urlencoding::encode(&self.bucket)
        )
    }

    fn objects_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}/o",
            self.endpoint,
            urlencoding::encode(&self.bucket)
        )
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}", self.objects_url(), urlencoding::encode(name))
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, StorageError> {
        match &self.tokens {
            Some(tokens) => Ok(request.bearer_auth(tokens.token(&self.http).await?)),
            None => Ok(request),
        }
    }

    async fn send(&self, request: RequestBuilder, name: &str) -> Result<Response, StorageError> {
        let response = self.authorize(request).await?.send().await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(name.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::Authorization(body))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::UnexpectedResponse {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let size = data.len();
        let request = self
            .http
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", name)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data);

        self.send(request, name).await?;
        tracing::debug!(bucket = %self.bucket, object = %name, size, "Uploaded object");

        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Bytes, StorageError> {
        let request = self.http.get(self.object_url(name)).query(&[("alt", "media")]);
        let response = self.send(request, name).await?;
        Ok(response.bytes().await?)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(self.objects_url()).query(&[("prefix", prefix)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListResponse = self.send(request, prefix).await?.json().await?;
            objects.extend(page.items.into_iter().map(ObjectInfo::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(bucket = %self.bucket, prefix = %prefix, count = objects.len(), "Listed objects");

        Ok(objects)
    }

    fn backend(&self) -> &'static str {
        "gcs"
    }
}
