//! Client for the HTTP file-management API of networked photo frames.
//!
//! The crate is split the way a request flows: [`client`] holds the
//! public verbs, [`protocol`] shapes request targets and bodies and parses
//! listings, and [`transport`] performs the HTTP exchange.

pub mod client;
pub mod config;
pub mod errors;
pub mod protocol;
pub mod transport;

pub use client::{DeleteSummary, FrameClient, TransferDescriptor};
pub use config::FrameConfig;
pub use errors::FrameError;
pub use protocol::{FolderListing, ListingEntry};
pub use transport::{HttpTransport, Transport};
