//! Durability layer for projdex
//!
//! Serializes the entry store to a self-describing binary stream and back:
//! - format: header layout and constants
//! - codec: encode/decode with bounded allocation and a CRC32 trailer
//! - file: atomic whole-file writes
//!
//! The projection matrix is never persisted. A stream records only the
//! reduced dimension it was written at, and decoding checks it against the
//! caller's configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod file;
pub mod format;

pub use codec::{decode, encode, encode_into, encoded_len};
pub use error::{CodecError, CodecResult};
pub use file::{read_file, write_file};
pub use format::{
    read_header, IndexHeader, CHECKSUM_SIZE, INDEX_FORMAT_VERSION, INDEX_HEADER_SIZE, INDEX_MAGIC,
};
