//! Transport Port - the HTTP seam between the resource surface and the wire
//!
//! The resource module never touches reqwest directly; it describes requests
//! as [`ApiRequest`] values and hands them to a [`Transport`]. Tests swap in
//! scripted transports, production uses the reqwest-backed [`HttpTransport`].

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Streamed response body, one chunk at a time.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// One file part of a multipart upload: original base name plus raw content.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<FilePart>,
    },
}

/// A transport-agnostic request description.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_multipart(mut self, fields: Vec<(String, String)>, files: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart { fields, files };
        self
    }
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::ResponseParse(e.to_string()))
    }
}

/// HTTP transport interface (allows scripted fakes in tests).
///
/// Implementations must already have mapped non-2xx responses to
/// [`Error::Api`] before returning, and must be safe for concurrent use.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and buffer the complete response body.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;

    /// Send a request and hand back the response body as a stream.
    async fn stream(&self, request: ApiRequest) -> Result<ByteStream>;
}

/// reqwest-backed transport (production).
///
/// The underlying `reqwest::Client` holds a shared connection pool and is
/// safe to use from any number of concurrent trackers.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(Error::Validation("base URL must not be empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = ?request.method, url = %url, "Dispatching API request");

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Patch => self.http.patch(&url),
            Method::Delete => self.http.delete(&url),
        };

        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { fields, files } => {
                let mut form = multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for file in files {
                    let part = multipart::Part::bytes(file.content)
                        .file_name(file.file_name)
                        .mime_str("application/octet-stream")
                        .map_err(|e| Error::Transport(format!("invalid file part: {e}")))?;
                    form = form.part("files", part);
                }
                builder.multipart(form)
            }
        };

        Ok(builder)
    }

    async fn execute(&self, request: ApiRequest) -> Result<reqwest::Response> {
        let response = self
            .build(request)?
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| String::new());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.execute(request).await?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }

    async fn stream(&self, request: ApiRequest) -> Result<ByteStream> {
        let response = self.execute(request).await?;
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| Error::Transport(e.to_string())))
            .boxed();

        Ok(stream)
    }
}
