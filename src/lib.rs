//! rangeserve - a small HTTP file server with byte-range streaming
//!
//! Lists directories as HTML and streams files, answering `Range` requests
//! with `206 Partial Content` without reading the skipped bytes.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod keep_awake;
pub mod logger;
pub mod server;
