//! Request handler module
//!
//! Responsible for request dispatch, file serving and directory listings.

pub mod files;
pub mod listing;
pub mod router;

// Re-export main entry points
pub use files::{resolve_path, RangeFileHandler, ResourceInfo};
pub use router::handle_request;
