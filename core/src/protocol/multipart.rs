//! Hand-built `multipart/form-data` framing for uploads.
//!
//! The device accepts exactly one part named `file`. The body is the head
//! (opening boundary and part headers), the raw payload, then the tail
//! (closing boundary). [`MultipartFrame::into_body`] chains the three as
//! one reader so the payload is streamed, never buffered whole.
//!
//! The boundary is a fixed token and the payload is not scanned for it.
//! A payload that contains `--Part-Boundary` on its own line produces a
//! body the device will misparse.

use std::io::Cursor;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Boundary token separating the parts.
pub const BOUNDARY: &str = "Part-Boundary";

/// Form field name the device reads the upload from.
pub const FIELD_NAME: &str = "file";

/// Mime type sent when the caller does not name one.
pub const DEFAULT_MIME_TYPE: &str = "content/unknown";

const CRLF: &str = "\r\n";

/// Framing for a single-part upload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFrame {
    mime_type: String,
}

impl MultipartFrame {
    /// Framing for a payload of `mime_type`, or `content/unknown` when `None`.
    pub fn new(mime_type: Option<&str>) -> Self {
        Self {
            mime_type: mime_type.unwrap_or(DEFAULT_MIME_TYPE).to_string(),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Value of the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary=\"{BOUNDARY}\"")
    }

    /// Opening boundary and part headers, up to and including the blank line.
    pub fn head(&self) -> Vec<u8> {
        format!(
            "--{BOUNDARY}{CRLF}\
             Content-Disposition: form-data; name=\"{FIELD_NAME}\"{CRLF}\
             Content-Type: {}{CRLF}\
             Content-Transfer-Encoding: binary{CRLF}{CRLF}",
            self.mime_type
        )
        .into_bytes()
    }

    /// Line break ending the payload plus the closing boundary.
    pub fn tail(&self) -> Vec<u8> {
        format!("{CRLF}--{BOUNDARY}--{CRLF}").into_bytes()
    }

    /// Total body length for a payload of `payload_len` bytes.
    pub fn content_length(&self, payload_len: u64) -> u64 {
        (self.head().len() + self.tail().len()) as u64 + payload_len
    }

    /// Frame `payload` as a streaming body: head, payload bytes, tail.
    pub fn into_body<R>(self, payload: R) -> impl AsyncRead + Send + Sync + Unpin
    where
        R: AsyncRead + Send + Sync + Unpin,
    {
        let head = Cursor::new(self.head());
        let tail = Cursor::new(self.tail());
        head.chain(payload).chain(tail)
    }
}
