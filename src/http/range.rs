//! HTTP Range request parsing module
//!
//! Single-range parser for resumable downloads and media seeking.
//! Deliberately narrow: no multi-range, no suffix ranges.

/// Length of the `bytes=` unit prefix, which is skipped without being checked
const UNIT_PREFIX_LEN: usize = 6;

/// Inclusive byte range inside a file, always resolved against its size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset
    pub start: u64,
    /// Last byte offset (inclusive)
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered, equal to the `Content-Length` of the response
    #[inline]
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a file of `size` bytes
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// No Range header, or one too short to hold a unit: serve the whole file
    None,
    /// Concrete range to serve with 206
    Valid(ByteRange),
    /// Start lies past the resolved end - should return 416
    NotSatisfiable,
}

/// Parse a Range header against a file of `file_size` bytes
///
/// Headers shorter than `bytes=` are treated as absent. Otherwise the first
/// six characters are skipped and the rest is split once on `-`:
/// - an unparsable start becomes 0
/// - an omitted, unparsable or zero end becomes `file_size - 1`
/// - an end beyond the file is clamped to `file_size - 1`
///
/// `bytes=0-0` is therefore indistinguishable from `bytes=0-`, `bytes=-N`
/// reads as `0-N`, and a multi-range list degrades to its first start.
///
/// # Examples
/// ```
/// use rangeserve::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=0-99"), 1000);
/// assert_eq!(result, RangeParseResult::Valid(ByteRange { start: 0, end: 99 }));
///
/// let result = parse_range_header(None, 1000);
/// assert_eq!(result, RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    if header.len() < UNIT_PREFIX_LEN {
        return RangeParseResult::None;
    }

    // Non-ASCII within the unit prefix cannot be a byte range
    let Some(spec) = header.get(UNIT_PREFIX_LEN..) else {
        return RangeParseResult::None;
    };

    let (start_str, end_str) = spec.split_once('-').unwrap_or((spec, ""));
    let start = start_str.trim().parse::<u64>().unwrap_or(0);
    let end = end_str.trim().parse::<u64>().unwrap_or(0);

    let Some(last) = file_size.checked_sub(1) else {
        return RangeParseResult::NotSatisfiable;
    };

    let end = if end == 0 { last } else { end.min(last) };

    if start > end {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(ByteRange { start, end })
}
