//! Codec error types

use projdex_storage::StoreError;
use thiserror::Error;

/// Errors raised while encoding or decoding an index stream
///
/// Every decode failure carries the byte offset at which it was detected.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Stream does not start with the index magic
    #[error("bad magic {found:02x?} at offset 0")]
    BadMagic {
        /// Bytes found instead
        found: [u8; 4],
    },

    /// Format version not understood by this build
    #[error("unsupported format version {version} at offset {offset}")]
    UnsupportedVersion {
        /// Offset of the version field
        offset: u64,
        /// Version found
        version: u16,
    },

    /// Reserved flag bits are set
    #[error("unknown flags {flags:#06x} at offset {offset}")]
    UnknownFlags {
        /// Offset of the flags field
        offset: u64,
        /// Flags found
        flags: u16,
    },

    /// Stored vectors have a different dimension than the configured projection
    #[error("dimension mismatch at offset {offset}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Offset of the dimension field
        offset: u64,
        /// Configured output dimension
        expected: usize,
        /// Dimension recorded in the stream
        found: u64,
    },

    /// Stream ended before the declared contents
    #[error("truncated at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Offset where more data was expected
        offset: u64,
        /// Bytes required
        needed: u64,
        /// Bytes left in the stream
        available: u64,
    },

    /// Identifier bytes are not UTF-8
    #[error("identifier at offset {offset} is not valid UTF-8")]
    InvalidIdentifier {
        /// Offset of the identifier bytes
        offset: u64,
    },

    /// Vector value is NaN or an infinity
    #[error("non-finite vector value at offset {offset}")]
    NonFiniteValue {
        /// Offset of the offending f32
        offset: u64,
    },

    /// Stored checksum does not match the contents
    #[error("checksum mismatch at offset {offset}: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Offset of the checksum field
        offset: u64,
        /// Checksum in the stream
        stored: u32,
        /// Checksum of the bytes read
        computed: u32,
    },

    /// Bytes follow the checksum
    #[error("{count} trailing bytes at offset {offset}")]
    TrailingBytes {
        /// Offset of the first extra byte
        offset: u64,
        /// Number of extra bytes
        count: u64,
    },

    /// Identifier too long for its u32 length prefix
    #[error("identifier of {len} bytes exceeds the format limit")]
    IdentifierTooLong {
        /// Identifier length in bytes
        len: usize,
    },

    /// Dimension too large for its u32 header field
    #[error("dimension {dimension} exceeds the format limit")]
    DimensionTooLarge {
        /// Rejected dimension
        dimension: usize,
    },

    /// Decoded entry was refused by the entry buffer
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Byte offset of a decode failure, if this is one
    pub fn offset(&self) -> Option<u64> {
        match self {
            CodecError::BadMagic { .. } => Some(0),
            CodecError::UnsupportedVersion { offset, .. }
            | CodecError::UnknownFlags { offset, .. }
            | CodecError::DimensionMismatch { offset, .. }
            | CodecError::Truncated { offset, .. }
            | CodecError::InvalidIdentifier { offset }
            | CodecError::NonFiniteValue { offset }
            | CodecError::ChecksumMismatch { offset, .. }
            | CodecError::TrailingBytes { offset, .. } => Some(*offset),
            CodecError::IdentifierTooLong { .. }
            | CodecError::DimensionTooLarge { .. }
            | CodecError::Store(_)
            | CodecError::Io(_) => None,
        }
    }

    /// Check if the stream itself failed validation
    pub fn is_corrupt(&self) -> bool {
        self.offset().is_some()
    }
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
