//! HTTP response building module
//!
//! Provides builders for each status the file server emits, decoupled from request handling.

use hyper::{Response, StatusCode};

use super::body::{self, FileBody};
use super::range::ByteRange;

/// Build a response with only a status line and an empty body (403, 404, 500)
pub fn build_empty_response(status: StatusCode) -> Response<FileBody> {
    Response::builder()
        .status(status)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(body::empty())
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<FileBody> {
    build_empty_response(StatusCode::NOT_FOUND)
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> Response<FileBody> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(body::empty())
        })
}

/// Build directory listing response
pub fn build_html_response(content: String) -> Response<FileBody> {
    let content_length = content.len();

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(body::full(content))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(body::empty())
        })
}

/// Build HEAD response: full-size metadata, no body
pub fn build_head_response(file_size: u64, content_type: &str) -> Response<FileBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", file_size)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("HEAD", &e);
            Response::new(body::empty())
        })
}

/// Build 200 response streaming the whole file
pub fn build_file_response(
    data: FileBody,
    content_type: &str,
    file_size: u64,
) -> Response<FileBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", file_size)
        .body(data)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(body::empty())
        })
}

/// Build 206 Partial Content response streaming `range`
pub fn build_partial_response(
    data: FileBody,
    content_type: &str,
    range: ByteRange,
    file_size: u64,
) -> Response<FileBody> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", content_type)
        .header("Accept-Ranges", "bytes")
        .header("Content-Range", range.content_range(file_size))
        .header("Content-Length", range.len())
        .body(data)
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(body::empty())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_responses() {
        assert_eq!(build_404_response().status(), 404);
        assert_eq!(build_empty_response(StatusCode::FORBIDDEN).status(), 403);
    }

    #[test]
    fn test_416_reports_size() {
        let resp = build_416_response(1234);
        assert_eq!(resp.status(), 416);
        assert_eq!(resp.headers()["content-range"], "bytes */1234");
    }

    #[test]
    fn test_partial_headers() {
        let range = ByteRange { start: 10, end: 19 };
        let resp = build_partial_response(body::empty(), "video/mp4", range, 100);
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers()["accept-ranges"], "bytes");
        assert_eq!(resp.headers()["content-range"], "bytes 10-19/100");
        assert_eq!(resp.headers()["content-length"], "10");
        assert_eq!(resp.headers()["content-type"], "video/mp4");
    }

    #[test]
    fn test_head_headers() {
        let resp = build_head_response(42, "text/plain");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], "42");
        assert_eq!(resp.headers()["content-type"], "text/plain");
    }
}
