//! Parsing of the XML folder listings returned by `/list`.
//!
//! A listing looks like:
//!
//! ```xml
//! <list path="/a/"><dir>b</dir><file>c.jpg</file></list>
//! ```
//!
//! The root element's name is not checked. Its `path` attribute is the
//! device's canonical form of the listed folder, and each `dir` or `file`
//! child carries one entry name as text. Other children are ignored.

use serde::{Deserialize, Serialize};

use crate::errors::FrameError;

/// One immediate child of a listed folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum ListingEntry {
    Directory(String),
    File(String),
}

impl ListingEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(name) | Self::File(name) => name,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

/// Parsed `/list` response, entries in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderListing {
    pub path: String,
    pub entries: Vec<ListingEntry>,
}

impl FolderListing {
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.is_directory())
            .map(ListingEntry::name)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.is_directory())
            .map(ListingEntry::name)
    }

    /// Device path of a child: the listing path followed by the entry name,
    /// with a trailing `/` for directories.
    pub fn child_path(&self, entry: &ListingEntry) -> String {
        match entry {
            ListingEntry::Directory(name) => format!("{}{name}/", self.path),
            ListingEntry::File(name) => format!("{}{name}", self.path),
        }
    }
}

/// Parse a listing document.
///
/// A missing `path` attribute yields an empty path. A `dir` or `file`
/// element without a text name is an error.
pub fn parse_listing(xml: &str) -> Result<FolderListing, FrameError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| FrameError::Parse(e.to_string()))?;
    let root = doc.root_element();
    let path = root.attribute("path").unwrap_or_default().to_string();

    let mut entries = Vec::new();
    for node in root.children().filter(|n| n.is_element()) {
        let tag = node.tag_name().name();
        if tag != "dir" && tag != "file" {
            continue;
        }
        let name = node
            .text()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FrameError::Parse(format!("<{tag}> entry without a name in {path}")))?
            .to_string();
        entries.push(if tag == "dir" {
            ListingEntry::Directory(name)
        } else {
            ListingEntry::File(name)
        });
    }

    Ok(FolderListing { path, entries })
}
