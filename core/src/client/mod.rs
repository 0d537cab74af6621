//! Operations on a photo frame's storage.
//!
//! [`FrameClient`] turns each verb into one or more request targets from
//! [`crate::protocol`], runs them through a [`Transport`] one at a time,
//! and interprets the answers. Most verbs pass the device's text response
//! through untouched; `upload` alone wraps its result in an XML envelope.

mod delete;
pub mod transfer;

use std::path::Path;

use image::DynamicImage;
use tokio::io::{AsyncReadExt, AsyncWrite};
use tracing::{debug, warn};

use crate::config::{FrameConfig, DEFAULT_CHUNK_SIZE};
use crate::errors::FrameError;
use crate::protocol::{
    delete_path, error_xml, get_path, list_path, mkdir_path, parse_listing, post_path,
    rename_path, success_xml, FolderListing, MultipartFrame, FILESYSTEMS_PATH,
};
use crate::transport::{HttpTransport, RequestBody, Transport};

pub use delete::DeleteSummary;
pub use transfer::TransferDescriptor;
use transfer::{copy_chunked, read_response};

/// Client for one device, generic over the transport.
///
/// Requests are issued strictly one after another; composite operations
/// (existence checks, recursive delete) never overlap requests.
pub struct FrameClient<T: Transport = HttpTransport> {
    transport: T,
    chunk_size: usize,
}

impl FrameClient<HttpTransport> {
    /// Client for `host` on the device port with default settings.
    pub fn new(host: impl Into<String>) -> Result<Self, FrameError> {
        Self::from_config(&FrameConfig::new(host))
    }

    pub fn from_config(config: &FrameConfig) -> Result<Self, FrameError> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
            chunk_size: config.chunk_size,
        })
    }

    pub fn host(&self) -> &str {
        self.transport.host()
    }

    /// Point the client at another device.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.transport.set_host(host);
    }
}

impl<T: Transport> FrameClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the buffer size used when streaming downloads to a sink.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Raw XML listing of `folder`.
    pub async fn list(&self, folder: &str) -> Result<String, FrameError> {
        let body = self.transport.get(&list_path(folder)).await?;
        read_response(body).await
    }

    /// Listing of `folder`, parsed.
    pub async fn list_folder(&self, folder: &str) -> Result<FolderListing, FrameError> {
        let xml = self.list(folder).await?;
        let listing = parse_listing(&xml)?;
        debug!(
            "Listed {} as {} ({} entries)",
            folder,
            listing.path,
            listing.entries.len()
        );
        Ok(listing)
    }

    /// Whether `folder` can be listed. Any failure counts as absent.
    pub async fn folder_exists(&self, folder: &str) -> bool {
        match self.list(folder).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Folder {} treated as absent: {}", folder, e);
                false
            }
        }
    }

    /// Fetch `filename` and decode it as an image.
    pub async fn get_image(&self, filename: &str) -> Result<DynamicImage, FrameError> {
        let mut body = self.transport.get(&get_path(filename)).await?;
        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes).await?;

        tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| FrameError::Decode(e.to_string()))?
            .map_err(|e| FrameError::Decode(format!("{filename}: {e}")))
    }

    /// Stream `filename` into `sink`. Returns the number of bytes written.
    pub async fn get_file<W>(&self, filename: &str, sink: &mut W) -> Result<u64, FrameError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let body = self.transport.get(&get_path(filename)).await?;
        let copied = copy_chunked(body, sink, self.chunk_size).await?;
        debug!("Fetched {} ({} bytes)", filename, copied);
        Ok(copied)
    }

    /// Download `filename` into a new local file at `local_path`.
    ///
    /// The local file is only created once the device has accepted the
    /// request, and is removed again if the transfer fails midway.
    pub async fn save_file(
        &self,
        filename: &str,
        local_path: impl AsRef<Path>,
    ) -> Result<u64, FrameError> {
        let local_path = local_path.as_ref();
        let body = self.transport.get(&get_path(filename)).await?;
        let mut file = tokio::fs::File::create(local_path).await?;

        match copy_chunked(body, &mut file, self.chunk_size).await {
            Ok(copied) => {
                debug!("Saved {} to {} ({} bytes)", filename, local_path.display(), copied);
                Ok(copied)
            }
            Err(e) => {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(local_path).await {
                    warn!(
                        "Could not remove partial download {}: {}",
                        local_path.display(),
                        cleanup
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Remove a file, or a folder that is already empty.
    pub async fn delete(&self, filename: &str) -> Result<String, FrameError> {
        let body = self.transport.get(&delete_path(filename)).await?;
        read_response(body).await
    }

    /// Upload a payload into an existing folder.
    ///
    /// When the folder does not exist nothing is posted and the result is
    /// an `error` envelope reading `<folder> not found.`. Otherwise the
    /// device's answer is returned inside a `success` envelope.
    pub async fn upload(&self, transfer: TransferDescriptor) -> Result<String, FrameError> {
        let TransferDescriptor {
            remote_folder,
            remote_filename,
            payload,
            length,
            mime_type,
        } = transfer;

        if !self.folder_exists(&remote_folder).await {
            debug!("Upload of {} skipped, {} is missing", remote_filename, remote_folder);
            return Ok(error_xml(&format!("{remote_folder} not found.")));
        }

        let frame = MultipartFrame::new(mime_type.as_deref());
        let content_type = frame.content_type();
        let content_length = frame.content_length(length);
        let body: RequestBody = Box::new(frame.into_body(payload));

        let response = self
            .transport
            .post(
                &post_path(&remote_folder, &remote_filename),
                body,
                content_length,
                &content_type,
            )
            .await?;
        Ok(success_xml(&read_response(response).await?))
    }

    /// Upload a local file as `folder`/`filename`.
    pub async fn upload_file(
        &self,
        folder: &str,
        filename: &str,
        local_path: impl AsRef<Path>,
        mime_type: Option<&str>,
    ) -> Result<String, FrameError> {
        let mut transfer = TransferDescriptor::open(folder, filename, local_path).await?;
        transfer.mime_type = mime_type.map(str::to_string);
        self.upload(transfer).await
    }

    /// Storage devices of the frame and their usage.
    pub async fn filesystem_info(&self) -> Result<String, FrameError> {
        let body = self.transport.get(FILESYSTEMS_PATH).await?;
        read_response(body).await
    }

    /// Create `new_name` inside `parent`.
    ///
    /// `parent` and `new_name` are sent concatenated, so `parent` should end
    /// in `/`. Fails with [`FrameError::NotFound`] before any mkdir request
    /// when `parent` cannot be listed.
    pub async fn make_dir(&self, parent: &str, new_name: &str) -> Result<String, FrameError> {
        if !self.folder_exists(parent).await {
            return Err(FrameError::NotFound(format!(
                "{parent} was not found from device"
            )));
        }
        let body = self.transport.get(&mkdir_path(parent, new_name)).await?;
        read_response(body).await
    }

    /// Rename `old_path` to `new_path`.
    ///
    /// Fails with [`FrameError::NotFound`] before any rename request when
    /// `old_path` cannot be listed.
    pub async fn rename(&self, old_path: &str, new_path: &str) -> Result<String, FrameError> {
        if !self.folder_exists(old_path).await {
            return Err(FrameError::NotFound(format!(
                "{old_path} was not found from device"
            )));
        }
        let body = self.transport.get(&rename_path(old_path, new_path)).await?;
        read_response(body).await
    }
}
