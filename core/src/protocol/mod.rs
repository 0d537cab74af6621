//! Request construction and response interpretation for the device's HTTP
//! file-management API.
//!
//! Nothing in this module performs network I/O. The builders return the
//! exact path-and-query strings sent on the wire.

pub mod encoding;
pub mod envelope;
pub mod listing;
pub mod multipart;

pub use encoding::encode_path_segment;
pub use envelope::{error_xml, success_xml};
pub use listing::{parse_listing, FolderListing, ListingEntry};
pub use multipart::{MultipartFrame, BOUNDARY, DEFAULT_MIME_TYPE, FIELD_NAME};

/// Folder listing endpoint, answered with an XML document.
pub const LIST_ENDPOINT: &str = "/list";

/// File download endpoint.
pub const GET_ENDPOINT: &str = "/get";

/// File and empty-folder removal endpoint.
pub const DELETE_ENDPOINT: &str = "/delete";

/// Multipart upload endpoint.
pub const POST_ENDPOINT: &str = "/post";

/// Folder creation endpoint.
pub const MKDIR_ENDPOINT: &str = "/mkdir";

/// Rename endpoint.
pub const RENAME_ENDPOINT: &str = "/rename";

/// Storage usage endpoint. Takes no query.
pub const FILESYSTEMS_PATH: &str = "/filesystems";

/// Encoded form of `/`, used to join a folder and a file name in one value.
pub const ENCODED_SEPARATOR: &str = "%2F";

// Path joins follow one rule: each component is encoded on its own and the
// encoded pieces are concatenated. `post_path` inserts an encoded separator
// between folder and file; `mkdir_path` inserts none, the caller's parent is
// expected to end in `/`.

/// `/list` target for `folder`.
pub fn list_path(folder: &str) -> String {
    format!("{LIST_ENDPOINT}?path={}", encode_path_segment(folder))
}

/// `/get` target for a file download.
pub fn get_path(filename: &str) -> String {
    format!("{GET_ENDPOINT}?path={}", encode_path_segment(filename))
}

/// `/delete` target for a file or an empty folder.
pub fn delete_path(filename: &str) -> String {
    format!("{DELETE_ENDPOINT}?path={}", encode_path_segment(filename))
}

/// `/post` target for `filename` inside `folder`, joined by an encoded `/`.
pub fn post_path(folder: &str, filename: &str) -> String {
    format!(
        "{POST_ENDPOINT}?path={}{ENCODED_SEPARATOR}{}",
        encode_path_segment(folder),
        encode_path_segment(filename)
    )
}

/// `/mkdir` target for `new_name` inside `parent`.
///
/// The two are joined with no separator, so `parent` should end in `/`;
/// `mkdir_path("/a", "new")` asks for `/anew`.
pub fn mkdir_path(parent: &str, new_name: &str) -> String {
    format!(
        "{MKDIR_ENDPOINT}?path={}{}",
        encode_path_segment(parent),
        encode_path_segment(new_name)
    )
}

/// `/rename` target moving `src` to `dst`.
pub fn rename_path(src: &str, dst: &str) -> String {
    format!(
        "{RENAME_ENDPOINT}?src={}&dst={}",
        encode_path_segment(src),
        encode_path_segment(dst)
    )
}
