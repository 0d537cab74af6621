//! Upload descriptors and streaming helpers shared by the operations.

use std::io;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::errors::FrameError;
use crate::transport::{RequestBody, ResponseBody};

/// Everything needed for one upload.
///
/// The payload is owned by the descriptor and released when the upload
/// finishes, whatever the outcome, including when the target folder turns
/// out to be missing and nothing is sent.
pub struct TransferDescriptor {
    pub remote_folder: String,
    pub remote_filename: String,
    pub payload: RequestBody,
    pub length: u64,
    /// `None` sends `content/unknown`.
    pub mime_type: Option<String>,
}

impl TransferDescriptor {
    /// Describe an upload of `length` bytes read from `payload`.
    pub fn new<R>(
        remote_folder: impl Into<String>,
        remote_filename: impl Into<String>,
        payload: R,
        length: u64,
    ) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        Self {
            remote_folder: remote_folder.into(),
            remote_filename: remote_filename.into(),
            payload: Box::new(payload),
            length,
            mime_type: None,
        }
    }

    /// Describe an upload of an in-memory buffer.
    pub fn from_bytes(
        remote_folder: impl Into<String>,
        remote_filename: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        let length = data.len() as u64;
        Self::new(
            remote_folder,
            remote_filename,
            io::Cursor::new(data),
            length,
        )
    }

    /// Describe an upload of a local file. The length is taken from the
    /// file's metadata.
    pub async fn open(
        remote_folder: impl Into<String>,
        remote_filename: impl Into<String>,
        local_path: impl AsRef<Path>,
    ) -> Result<Self, FrameError> {
        let file = tokio::fs::File::open(local_path.as_ref()).await?;
        let length = file.metadata().await?.len();
        Ok(Self::new(remote_folder, remote_filename, file, length))
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

impl std::fmt::Debug for TransferDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferDescriptor")
            .field("remote_folder", &self.remote_folder)
            .field("remote_filename", &self.remote_filename)
            .field("length", &self.length)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

/// Read a text response line by line, re-joining the lines with `\n`.
///
/// Every line, including the last, is followed by `\n`; `\r\n` endings
/// are normalized. The device does not promise UTF-8, so each line is
/// decoded lossily.
pub(crate) async fn read_response(body: ResponseBody) -> Result<String, FrameError> {
    let mut reader = BufReader::new(body);
    let mut line = Vec::new();
    let mut text = String::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        text.push_str(&String::from_utf8_lossy(&line));
        text.push('\n');
    }
    Ok(text)
}

/// Copy `reader` into `writer` through a buffer of `chunk_size` bytes and
/// flush the writer. Returns the number of bytes copied.
pub(crate) async fn copy_chunked<R, W>(
    reader: R,
    writer: &mut W,
    chunk_size: usize,
) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut reader = BufReader::with_capacity(chunk_size, reader);
    let copied = tokio::io::copy_buf(&mut reader, writer).await?;
    writer.flush().await?;
    Ok(copied)
}
