//! Recursive folder removal.
//!
//! The device can only delete single files and empty folders, so a tree is
//! removed depth-first, post-order: list the folder, remove each child in
//! document order (recursing into subfolders), then remove the folder
//! itself. Requests are strictly sequential.
//!
//! There is no rollback. The first failure, including an unparsable
//! listing, stops the walk and is reported as
//! [`FrameError::FolderDelete`] naming the folder being processed and the
//! number of entries already gone.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info, warn};

use super::FrameClient;
use crate::errors::FrameError;
use crate::protocol::ListingEntry;
use crate::transport::Transport;

/// Counts of what a completed recursive delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub files: usize,
    /// Includes the root folder.
    pub folders: usize,
}

impl DeleteSummary {
    pub fn total(&self) -> usize {
        self.files + self.folders
    }
}

type DeleteFuture<'a> = Pin<Box<dyn Future<Output = Result<(), FrameError>> + Send + 'a>>;

impl<T: Transport> FrameClient<T> {
    /// Delete `folder` and everything below it.
    ///
    /// Subfolder paths are built from the listing's `path` attribute plus
    /// the entry name and a trailing `/`; the root itself is deleted by the
    /// path given here. A listing without a `path` falls back to `folder`
    /// with a trailing `/`.
    pub async fn delete_folder(&self, folder: &str) -> Result<DeleteSummary, FrameError> {
        let mut summary = DeleteSummary::default();
        self.delete_tree(folder, &mut summary).await?;
        info!(
            "Deleted {} ({} files, {} folders)",
            folder, summary.files, summary.folders
        );
        Ok(summary)
    }

    fn delete_tree<'a>(&'a self, folder: &'a str, summary: &'a mut DeleteSummary) -> DeleteFuture<'a> {
        Box::pin(async move {
            let mut listing = match self.list_folder(folder).await {
                Ok(listing) => listing,
                Err(e) => return Err(abort(folder, summary, e)),
            };
            if listing.path.is_empty() {
                listing.path = if folder.ends_with('/') {
                    folder.to_string()
                } else {
                    format!("{folder}/")
                };
            }

            for entry in &listing.entries {
                let child = listing.child_path(entry);
                match entry {
                    ListingEntry::Directory(_) => {
                        self.delete_tree(&child, summary).await?;
                    }
                    ListingEntry::File(_) => {
                        if let Err(e) = self.delete(&child).await {
                            return Err(abort(folder, summary, e));
                        }
                        debug!("Deleted file {}", child);
                        summary.files += 1;
                    }
                }
            }

            if let Err(e) = self.delete(folder).await {
                return Err(abort(folder, summary, e));
            }
            debug!("Deleted folder {}", folder);
            summary.folders += 1;
            Ok(())
        })
    }
}

fn abort(folder: &str, summary: &DeleteSummary, source: FrameError) -> FrameError {
    warn!(
        "Folder delete stopped in {} after {} removals: {}",
        folder,
        summary.total(),
        source
    );
    FrameError::FolderDelete {
        path: folder.to_string(),
        deleted: summary.total(),
        source: Box::new(source),
    }
}
