//! MIME type and icon detection module
//!
//! Returns the Content-Type and listing icon for a request path based on its extension.

/// Fallback for files with an unmapped extension
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Bootstrap Icons glyph shown next to an entry in a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Film,
    Code,
    Music,
    Image,
    Text,
    Folder,
    Parent,
    None,
}

impl Icon {
    /// Icon markup, empty for `Icon::None`
    pub const fn html(self) -> &'static str {
        match self {
            Self::Film => r#"<i class="bi bi-film"></i>"#,
            Self::Code => r#"<i class="bi bi-file-code"></i>"#,
            Self::Music => r#"<i class="bi bi-file-music"></i>"#,
            Self::Image => r#"<i class="bi bi-file-image"></i>"#,
            Self::Text => r#"<i class="bi bi-file-text"></i>"#,
            Self::Folder => r#"<i class="bi bi-folder"></i>"#,
            Self::Parent => r#"<i class="bi bi-box-arrow-in-up"></i>"#,
            Self::None => "",
        }
    }
}

/// Extension (without dot) -> (Content-Type, icon)
const TYPES: &[(&str, &str, Icon)] = &[
    // Video
    ("mp4", "video/mp4", Icon::Film),
    ("mkv", "video/mkv", Icon::Film),
    ("webm", "video/webm", Icon::Film),
    // Code and markup
    ("css", "text/stylesheet", Icon::Code),
    ("js", "text/javascript", Icon::Code),
    ("json", "text/json", Icon::Code),
    ("yaml", "text/yaml", Icon::Code),
    ("toml", "text/toml", Icon::Code),
    ("html", "text/html", Icon::Code),
    ("php", "text/plain", Icon::Code),
    ("cpp", "text/plain", Icon::Code),
    ("c", "text/plain", Icon::Code),
    ("h", "text/plain", Icon::Code),
    ("go", "text/plain", Icon::Code),
    ("rs", "text/plain", Icon::Code),
    // Audio
    ("flac", "audio/flac", Icon::Music),
    ("wma", "audio/wma", Icon::Music),
    ("mp3", "audio/mp3", Icon::Music),
    ("wav", "audio/wav", Icon::Music),
    ("ogg", "audio/ogg", Icon::Music),
    // Images
    ("gif", "image/gif", Icon::Image),
    ("bmp", "image/bmp", Icon::Image),
    ("ico", "image/ico", Icon::None),
    ("jpg", "image/jpg", Icon::Image),
    ("jpeg", "image/jpeg", Icon::Image),
    ("heic", "image/heic", Icon::Image),
    ("webp", "image/webp", Icon::Image),
    // Text
    ("txt", "text/plain", Icon::Text),
    ("md", "text/markdown", Icon::Text),
];

/// Extension of the last path segment, without the dot
///
/// A path ending in `/` has no extension, whatever its directory is called.
fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map(|(_, ext)| ext)
}

fn lookup(path: &str) -> Option<(&'static str, Icon)> {
    let ext = extension(path)?;
    TYPES
        .iter()
        .find(|(e, _, _)| *e == ext)
        .map(|&(_, content_type, icon)| (content_type, icon))
}

/// Get MIME Content-Type for a path
///
/// # Examples
/// ```
/// use rangeserve::http::mime::get_content_type;
/// assert_eq!(get_content_type("movie.mp4"), "video/mp4");
/// assert_eq!(get_content_type("archive.xyz"), "application/octet-stream");
/// assert_eq!(get_content_type("photos/"), "");
/// ```
pub fn get_content_type(path: &str) -> &'static str {
    match lookup(path) {
        Some((content_type, _)) => content_type,
        None if path.ends_with('/') => "",
        None => OCTET_STREAM,
    }
}

/// Get listing icon for a link target (directories carry a trailing `/`)
pub fn get_icon(path: &str) -> Icon {
    if path == "../" {
        return Icon::Parent;
    }
    match lookup(path) {
        Some((_, icon)) => icon,
        None if path.ends_with('/') => Icon::Folder,
        None => Icon::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type("a/b/clip.mkv"), "video/mkv");
        assert_eq!(get_content_type("style.css"), "text/stylesheet");
        assert_eq!(get_content_type("main.rs"), "text/plain");
        assert_eq!(get_content_type("song.flac"), "audio/flac");
        assert_eq!(get_content_type("img.heic"), "image/heic");
        assert_eq!(get_content_type("README.md"), "text/markdown");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type("data.xyz"), OCTET_STREAM);
        assert_eq!(get_content_type("Makefile"), OCTET_STREAM);
        assert_eq!(get_icon("data.xyz"), Icon::None);
    }

    #[test]
    fn test_directory_paths() {
        assert_eq!(get_content_type("photos/"), "");
        assert_eq!(get_icon("photos/"), Icon::Folder);
        // the extension of a directory name is ignored
        assert_eq!(get_icon("season.mp4/"), Icon::Folder);
        assert_eq!(get_icon("../"), Icon::Parent);
    }

    #[test]
    fn test_icons() {
        assert_eq!(get_icon("movie.webm"), Icon::Film);
        assert_eq!(get_icon("lib.h"), Icon::Code);
        assert_eq!(get_icon("notes.txt"), Icon::Text);
        assert_eq!(get_icon("favicon.ico"), Icon::None);
        assert_eq!(Icon::Image.html(), r#"<i class="bi bi-file-image"></i>"#);
        assert_eq!(Icon::None.html(), "");
    }
}
