//! Request dispatch module
//!
//! Entry point for HTTP request processing: extracts what the file handler
//! needs from the request and writes the access log.

use hyper::header::{self, HeaderMap};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::handler::files::RangeFileHandler;
use crate::http::FileBody;
use crate::logger::{self, AccessLogEntry};

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<FileBody>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let uri = req.uri();
    let range_header = header_str(req.headers(), header::RANGE);

    logger::log_debug(&format!(
        "{method} {} range={}",
        uri.path(),
        range_header.as_deref().unwrap_or("-")
    ));

    let handler = RangeFileHandler::new(&state.root, &state.config.listing.exclude);
    let response = handler
        .handle(method, uri.path(), range_header.as_deref())
        .await;

    if state.access_log_enabled() {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = format!("{:?}", req.version())
            .trim_start_matches("HTTP/")
            .to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = if *method == hyper::Method::HEAD {
            0
        } else {
            response
                .headers()
                .get(header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        };
        entry.range = range_header;
        entry.referer = header_str(req.headers(), header::REFERER);
        entry.user_agent = header_str(req.headers(), header::USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;

    fn state_for(root: &std::path::Path) -> Arc<AppState> {
        let mut cfg = Config::load_from("does-not-exist/config").unwrap();
        cfg.server.root = root.display().to_string();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg))
    }

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_range_header_reaches_handler() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"abcdefghij").unwrap();

        let req = Request::get("/clip.mp4")
            .header("Range", "bytes=2-4")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let resp = handle_request(req, state_for(dir.path()), addr()).await.unwrap();

        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers()["content-type"], "video/mp4");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("cde"));
    }

    #[tokio::test]
    async fn test_encoded_path_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my notes.txt"), b"hi").unwrap();

        let req = Request::get("/my%20notes.txt")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let resp = handle_request(req, state_for(dir.path()), addr()).await.unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/plain");
    }
}
