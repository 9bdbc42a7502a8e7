//! Errors while reading event files.
use thiserror::Error;

/// Errors raised while decoding one event file.
///
/// The per-directory loader treats these as the end of the affected file
/// rather than a fatal condition: live training writers routinely leave a
/// half-written record at the tail.
#[derive(Error, Debug)]
pub enum EventReadError {
    /// The file ended inside a record.
    #[error("event file ended inside a record")]
    TruncatedRecord,

    /// The checksum guarding a record length did not match.
    #[error("record length checksum mismatch (expected {expected:#010x}, found {found:#010x})")]
    LengthCrcMismatch {
        /// Checksum stored in the file.
        expected: u32,
        /// Checksum computed from the bytes read.
        found: u32,
    },

    /// The checksum guarding a record payload did not match.
    #[error("record payload checksum mismatch (expected {expected:#010x}, found {found:#010x})")]
    PayloadCrcMismatch {
        /// Checksum stored in the file.
        expected: u32,
        /// Checksum computed from the bytes read.
        found: u32,
    },

    /// The record payload is not a decodable event message.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
