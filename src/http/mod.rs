//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the file handler.

pub mod body;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::FileBody;
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{build_404_response, build_416_response, build_empty_response};
