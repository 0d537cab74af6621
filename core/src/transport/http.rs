//! [`Transport`] over plain HTTP/1.1 using `reqwest`.

use std::io;

use futures_util::TryStreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::debug;

use super::{RequestBody, ResponseBody, Transport};
use crate::config::FrameConfig;
use crate::errors::FrameError;

/// HTTP transport to one device.
///
/// Idle connection pooling is disabled, so every exchange opens its own
/// connection and releases it when the response body is dropped. The
/// device's embedded server does not cope with kept-alive sockets.
pub struct HttpTransport {
    client: reqwest::Client,
    host: String,
    port: u16,
    chunk_size: usize,
}

impl HttpTransport {
    pub fn new(config: &FrameConfig) -> Result<Self, FrameError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .connect_timeout(config.connect_timeout())
            .no_proxy();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FrameError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            host: config.host.clone(),
            port: config.port,
            chunk_size: config.chunk_size,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Point subsequent requests at another host. The port is unchanged.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path_and_query)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        path_and_query: &str,
    ) -> Result<ResponseBody, FrameError> {
        let response = request
            .send()
            .await
            .map_err(|e| map_request_error(e, path_and_query))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FrameError::Status {
                status: status.as_u16(),
                path: path_and_query.to_string(),
            });
        }

        let stream = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| io::Error::new(error_kind(&e), e)),
        );
        Ok(Box::new(StreamReader::new(stream)))
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path_and_query: &str) -> Result<ResponseBody, FrameError> {
        debug!("GET {}{}", self.host, path_and_query);
        let request = self.client.get(self.url(path_and_query));
        self.send(request, path_and_query).await
    }

    async fn post(
        &self,
        path_and_query: &str,
        body: RequestBody,
        length: u64,
        content_type: &str,
    ) -> Result<ResponseBody, FrameError> {
        debug!("POST {}{} ({} bytes)", self.host, path_and_query, length);
        let stream = ReaderStream::with_capacity(body, self.chunk_size);
        let request = self
            .client
            .post(self.url(path_and_query))
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, length)
            .body(reqwest::Body::wrap_stream(stream));
        self.send(request, path_and_query).await
    }
}

/// Map a `reqwest` failure to an I/O error of the matching kind.
fn map_request_error(e: reqwest::Error, path_and_query: &str) -> FrameError {
    FrameError::Io(io::Error::new(
        error_kind(&e),
        format!("{path_and_query}: {e}"),
    ))
}

fn error_kind(e: &reqwest::Error) -> io::ErrorKind {
    if e.is_timeout() {
        io::ErrorKind::TimedOut
    } else if e.is_connect() {
        io::ErrorKind::ConnectionRefused
    } else {
        io::ErrorKind::Other
    }
}
