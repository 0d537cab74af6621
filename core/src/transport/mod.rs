//! One-request-at-a-time HTTP exchange with the device.
//!
//! [`Transport`] is the seam between the operation layer and the network.
//! [`HttpTransport`] talks to a real frame; tests substitute an in-memory
//! device. Each call owns its request from start to finish, nothing is
//! shared between calls.

pub mod http;

use tokio::io::AsyncRead;

use crate::errors::FrameError;

pub use http::HttpTransport;

/// Streaming request body handed to [`Transport::post`].
pub type RequestBody = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// Streaming response body returned by a successful exchange.
pub type ResponseBody = Box<dyn AsyncRead + Send + Unpin>;

/// Performs single HTTP exchanges against the configured device.
///
/// `path_and_query` is the exact, already encoded request target (for
/// example `/list?path=%2Fa%2F`). A non-success status or any network
/// fault is an error; there is no retry.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and return the response body.
    async fn get(&self, path_and_query: &str) -> Result<ResponseBody, FrameError>;

    /// Issue a POST streaming `body` (exactly `length` bytes) and return the
    /// response body. `body` is consumed and dropped on every exit path.
    async fn post(
        &self,
        path_and_query: &str,
        body: RequestBody,
        length: u64,
        content_type: &str,
    ) -> Result<ResponseBody, FrameError>;
}
