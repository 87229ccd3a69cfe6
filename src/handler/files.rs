//! File serving module
//!
//! Resolves a request path against the server root and answers with a
//! directory listing, a whole file, a byte range, or headers only.

use hyper::{Method, Response};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs::{self, File};

use crate::error::{Result, ServeError};
use crate::handler::listing;
use crate::http::{self, body, mime, response, FileBody, RangeParseResult};
use crate::logger;

/// Stat-derived metadata for a resolved path
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl ResourceInfo {
    /// Stat `path`, following symlinks; any failure means the resource does not exist
    pub async fn stat(path: PathBuf) -> Result<Self> {
        match fs::metadata(&path).await {
            Ok(meta) => Ok(Self {
                is_dir: meta.is_dir(),
                size: meta.len(),
                modified: meta.modified().ok(),
                path,
            }),
            Err(_) => Err(ServeError::NotFound(path.display().to_string())),
        }
    }
}

/// Join a percent-encoded request path onto `root`
///
/// Components are normalized lexically: `.` and empty segments are dropped,
/// `..` removes the previous segment and is ignored at the root. The result
/// is always `root` itself or a path below it. Returns `None` for paths that
/// carry a drive prefix anywhere, since pushing one replaces the whole path.
pub fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();
    let mut segments: Vec<&str> = Vec::new();

    for component in Path::new(decoded.as_ref()).components() {
        match component {
            Component::Normal(seg) => {
                let seg = seg.to_str()?;
                if !is_plain_segment(seg) {
                    return None;
                }
                segments.push(seg);
            }
            Component::ParentDir => {
                segments.pop();
            }
            Component::RootDir | Component::CurDir => {}
            Component::Prefix(_) => return None,
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);
    resolved.starts_with(root).then_some(resolved)
}

/// A segment that parses back as exactly one normal component
fn is_plain_segment(seg: &str) -> bool {
    let mut components = Path::new(seg).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Serves a directory tree with byte-range support
pub struct RangeFileHandler<'a> {
    root: &'a Path,
    exclude: &'a [String],
}

impl<'a> RangeFileHandler<'a> {
    pub const fn new(root: &'a Path, exclude: &'a [String]) -> Self {
        Self { root, exclude }
    }

    /// Produce the response for one request
    ///
    /// `path` is the raw URI path; `range_header` the raw `Range` value.
    /// Failures are logged here and turned into empty-bodied responses.
    pub async fn handle(
        &self,
        method: &Method,
        path: &str,
        range_header: Option<&str>,
    ) -> Response<FileBody> {
        match self.try_handle(method, path, range_header).await {
            Ok(resp) => resp,
            Err(err) => error_response(err),
        }
    }

    async fn try_handle(
        &self,
        method: &Method,
        path: &str,
        range_header: Option<&str>,
    ) -> Result<Response<FileBody>> {
        let resolved = resolve_path(self.root, path)
            .ok_or_else(|| ServeError::NotFound(path.to_string()))?;
        let info = ResourceInfo::stat(resolved).await?;

        match (method, info.is_dir) {
            (&Method::GET, true) => self.serve_listing(path, &info).await,
            (&Method::HEAD, false) => Ok(response::build_head_response(
                info.size,
                content_type_of(&info.path),
            )),
            (&Method::GET, false) => serve_file(&info, range_header).await,
            _ => Ok(http::build_404_response()),
        }
    }

    async fn serve_listing(&self, path: &str, info: &ResourceInfo) -> Result<Response<FileBody>> {
        let entries = listing::read_entries(&info.path, self.exclude)
            .await
            .map_err(|source| ServeError::ServerFault {
                path: info.path.display().to_string(),
                source,
            })?;
        let display_path = percent_decode_str(path).decode_utf8_lossy();
        let html = listing::render(&display_path, &entries);
        Ok(response::build_html_response(html))
    }
}

/// Log a failed request and turn it into its empty-bodied response
fn error_response(err: ServeError) -> Response<FileBody> {
    match &err {
        ServeError::NotFound(_) => logger::log_debug(&err.to_string()),
        ServeError::Forbidden { .. } | ServeError::RangeNotSatisfiable { .. } => {
            logger::log_warning(&err.to_string());
        }
        ServeError::ServerFault { .. } => logger::log_error(&err.to_string()),
    }
    match err {
        ServeError::RangeNotSatisfiable { size, .. } => http::build_416_response(size),
        other => http::build_empty_response(other.status()),
    }
}

/// Content-Type by the extension of the file name
fn content_type_of(path: &Path) -> &'static str {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(mime::OCTET_STREAM, mime::get_content_type)
}

async fn serve_file(info: &ResourceInfo, range_header: Option<&str>) -> Result<Response<FileBody>> {
    let file = File::open(&info.path)
        .await
        .map_err(|source| ServeError::Forbidden {
            path: info.path.display().to_string(),
            source,
        })?;
    let content_type = content_type_of(&info.path);

    match http::parse_range_header(range_header, info.size) {
        RangeParseResult::None => Ok(response::build_file_response(
            body::whole_file(file),
            content_type,
            info.size,
        )),
        RangeParseResult::Valid(range) => {
            let data = body::file_slice(file, range)
                .await
                .map_err(|source| ServeError::ServerFault {
                    path: info.path.display().to_string(),
                    source,
                })?;
            Ok(response::build_partial_response(
                data,
                content_type,
                range,
                info.size,
            ))
        }
        RangeParseResult::NotSatisfiable => Err(ServeError::RangeNotSatisfiable {
            header: range_header.unwrap_or_default().to_string(),
            size: info.size,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn root() -> PathBuf {
        PathBuf::from("/srv/share")
    }

    #[test]
    fn test_resolve_plain_path() {
        assert_eq!(
            resolve_path(&root(), "/movies/a.mp4"),
            Some(PathBuf::from("/srv/share/movies/a.mp4"))
        );
        assert_eq!(resolve_path(&root(), "/"), Some(root()));
        assert_eq!(resolve_path(&root(), ""), Some(root()));
    }

    #[test]
    fn test_resolve_decodes_percent_escapes() {
        assert_eq!(
            resolve_path(&root(), "/my%20files/%E4%B8%AD.txt"),
            Some(PathBuf::from("/srv/share/my files/中.txt"))
        );
    }

    #[test]
    fn test_resolve_never_escapes_root() {
        for attempt in [
            "/../etc/passwd",
            "/../../../../etc/passwd",
            "/a/../../etc/passwd",
            "/%2e%2e/%2e%2e/etc/passwd",
            "/a/./b/../../../etc/passwd",
            "//etc/passwd",
            "/x/C:/Windows/win.ini",
        ] {
            if let Some(resolved) = resolve_path(&root(), attempt) {
                assert!(
                    resolved.starts_with(root()),
                    "{attempt} resolved outside root: {}",
                    resolved.display()
                );
            }
        }
        assert_eq!(
            resolve_path(&root(), "/a/../b"),
            Some(PathBuf::from("/srv/share/b"))
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_resolve_rejects_inner_drive_prefix() {
        let root = PathBuf::from(r"D:\share");
        assert_eq!(resolve_path(&root, "/x/C:/Windows/win.ini"), None);
        assert_eq!(resolve_path(&root, "/x/C%3A/Windows/win.ini"), None);
        assert_eq!(resolve_path(&root, r"/x/..\..\..\win.ini"), Some(root.join("win.ini")));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_keeps_colon_names_on_unix() {
        assert_eq!(
            resolve_path(&root(), "/a%3Ab.txt"),
            Some(PathBuf::from("/srv/share/a:b.txt"))
        );
    }

    fn missing_info(dir: &Path, is_dir: bool) -> ResourceInfo {
        ResourceInfo {
            path: dir.join("gone"),
            is_dir,
            size: 0,
            modified: None,
        }
    }

    #[tokio::test]
    async fn test_unreadable_directory_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let exclude = Vec::new();
        let handler = RangeFileHandler::new(dir.path(), &exclude);

        // Stat succeeded earlier, the directory is gone by the time it is read
        let err = handler
            .serve_listing("/gone/", &missing_info(dir.path(), true))
            .await
            .unwrap_err();
        assert!(matches!(err, ServeError::ServerFault { .. }));

        let resp = error_response(err);
        assert_eq!(resp.status(), 500);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unopenable_file_is_403() {
        let dir = tempfile::tempdir().unwrap();

        let err = serve_file(&missing_info(dir.path(), false), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServeError::Forbidden { .. }));

        let resp = error_response(err);
        assert_eq!(resp.status(), 403);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_stat_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResourceInfo::stat(dir.path().join("missing")).await.unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn test_head_on_directory_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let exclude = Vec::new();
        let handler = RangeFileHandler::new(dir.path(), &exclude);
        let resp = handler.handle(&Method::HEAD, "/", None).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_other_methods_are_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        let exclude = Vec::new();
        let handler = RangeFileHandler::new(dir.path(), &exclude);

        for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS] {
            let resp = handler.handle(&method, "/a.txt", None).await;
            assert_eq!(resp.status(), 404);
            let body = resp.into_body().collect().await.unwrap().to_bytes();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_unsatisfiable_range_is_416() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bin"), b"0123456789").unwrap();
        let exclude = Vec::new();
        let handler = RangeFileHandler::new(dir.path(), &exclude);

        let resp = handler.handle(&Method::GET, "/a.bin", Some("bytes=20-30")).await;
        assert_eq!(resp.status(), 416);
        assert_eq!(resp.headers()["content-range"], "bytes */10");
    }
}
