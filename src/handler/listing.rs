//! Directory listing module
//!
//! Enumerates a directory and renders it as an HTML table.

use chrono::{DateTime, Local};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

use crate::http::mime;

/// Characters escaped in a single path segment of a link
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'=')
    .remove(b'@');

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * KIB;
const GIB: f64 = 1024.0 * MIB;
/// A unit is used once the value reaches 1.1 of it
const UNIT_THRESHOLD: f64 = 1.1;

/// One child of a listed directory
#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl ListingEntry {
    /// Relative link target; directories get a trailing `/`
    pub fn link(&self) -> String {
        let escaped = utf8_percent_encode(&self.name, PATH_SEGMENT).to_string();
        if self.is_dir {
            escaped + "/"
        } else {
            escaped
        }
    }
}

/// Dotfiles and excluded names never appear in a listing
pub fn is_hidden(name: &str, exclude: &[String]) -> bool {
    name.starts_with('.') || exclude.iter().any(|e| e == name)
}

/// Read the immediate children of `dir`, sorted by name
///
/// Entries that vanish or cannot be stat-ed between enumeration and stat are skipped.
pub async fn read_entries(dir: &Path, exclude: &[String]) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name, exclude) {
            continue;
        }
        // Follow symlinks, like the request path itself
        let Ok(meta) = fs::metadata(entry.path()).await else {
            continue;
        };
        entries.push(ListingEntry {
            name,
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: meta.modified().ok(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Human-readable size with one decimal and a K, M or G suffix
///
/// ```
/// use rangeserve::handler::listing::format_size;
/// assert_eq!(format_size(500), "0.5K");
/// assert_eq!(format_size(2 * 1024 * 1024), "2.0M");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_size(size: u64) -> String {
    let fsize = size as f64;
    if fsize >= UNIT_THRESHOLD * GIB {
        format!("{:.1}G", fsize / GIB)
    } else if fsize >= UNIT_THRESHOLD * MIB {
        format!("{:.1}M", fsize / MIB)
    } else {
        format!("{:.1}K", fsize / KIB)
    }
}

/// Modification time as `YYYY-MM-DD HH:MM` in local time
pub fn format_mtime(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Render the listing page for `request_path`
pub fn render(request_path: &str, entries: &[ListingEntry]) -> String {
    let mut html = format!(
        r#"<html>
<head>
    <meta charset="utf-8">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css" crossorigin="anonymous">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@4.4.1/dist/css/bootstrap.min.css" crossorigin="anonymous">
</head>
<body>
<div class="container">

<div class="row pt-3 pb-2"><div class="col-12">
    <h5>Index of <code>{}</code></h5>
</div></div>

<div class="row"><div class="col-12">

<table class="table">
    <thead>
        <tr>
            <th>Name</th>
            <th style="width: 14em;">Modified</th>
            <th style="width: 5em;">Size</th>
        </tr>
    </thead>
    <tbody>
        <tr><td>{} <a href="../">Parent directory</a></td><td>&nbsp;</td><td>&nbsp;</td></tr>
"#,
        html_escape::encode_text(request_path),
        mime::get_icon("../").html(),
    );

    for entry in entries {
        let link = entry.link();
        let (modified, size) = if entry.is_dir {
            ("-".to_string(), "-".to_string())
        } else {
            (
                entry.modified.map_or_else(|| "-".to_string(), format_mtime),
                format_size(entry.size),
            )
        };
        // Writing to a String cannot fail
        let _ = writeln!(
            html,
            r#"        <tr>
            <td>{} <a href="{}">{}</a></td>
            <td class="text-secondary">{}</td>
            <td class="text-secondary">{}</td>
        </tr>"#,
            mime::get_icon(&link).html(),
            html_escape::encode_double_quoted_attribute(&link),
            html_escape::encode_text(&entry.name),
            modified,
            size,
        );
    }

    html.push_str(
        r"    </tbody>
</table>

</div></div>

</div>
</body>
</html>",
    );
    html
}
