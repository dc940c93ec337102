//! On-disk byte format for index files.
//!
//! All integers and floats are little-endian.
//!
//! ```text
//! offset  size        field
//! 0       4           magic  b"PDXI"
//! 4       2           format version (u16)
//! 6       2           flags (u16, reserved, must be 0)
//! 8       4           dimension (u32)
//! 12      8           entry count (u64)
//! 20      ...         entries, in insertion order:
//!                       u32 identifier byte length
//!                       identifier bytes (UTF-8)
//!                       dimension × f32
//! end-4   4           CRC32 of every preceding byte
//! ```
//!
//! The projection matrix is not part of the file.

use crate::error::{CodecError, CodecResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Write};

/// Magic bytes at the start of every index file
pub const INDEX_MAGIC: [u8; 4] = *b"PDXI";

/// Current format version
pub const INDEX_FORMAT_VERSION: u16 = 1;

/// Fixed header size in bytes
pub const INDEX_HEADER_SIZE: usize = 20;

/// Checksum trailer size in bytes
pub const CHECKSUM_SIZE: usize = 4;

const VERSION_OFFSET: u64 = 4;
const FLAGS_OFFSET: u64 = 6;
pub(crate) const DIMENSION_OFFSET: u64 = 8;

/// Parsed file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    /// Format version
    pub version: u16,
    /// Reserved flags
    pub flags: u16,
    /// Reduced vector dimension
    pub dimension: u32,
    /// Declared number of entries
    pub count: u64,
}

impl IndexHeader {
    /// Header for the current format version
    pub fn new(dimension: u32, count: u64) -> Self {
        Self {
            version: INDEX_FORMAT_VERSION,
            flags: 0,
            dimension,
            count,
        }
    }

    /// Serialize the header
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&INDEX_MAGIC)?;
        writer.write_u16::<LittleEndian>(self.version)?;
        writer.write_u16::<LittleEndian>(self.flags)?;
        writer.write_u32::<LittleEndian>(self.dimension)?;
        writer.write_u64::<LittleEndian>(self.count)?;
        Ok(())
    }

    /// Parse and validate a header.
    ///
    /// # Errors
    /// - `Truncated` if fewer than [`INDEX_HEADER_SIZE`] bytes are present
    /// - `BadMagic`, `UnsupportedVersion` or `UnknownFlags` on invalid fields
    pub(crate) fn read_from(reader: &mut SliceReader<'_>) -> CodecResult<Self> {
        let magic = reader.bytes(INDEX_MAGIC.len())?;
        if magic != INDEX_MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(magic);
            return Err(CodecError::BadMagic { found });
        }

        reader.ensure(INDEX_HEADER_SIZE - INDEX_MAGIC.len())?;
        let version = reader.u16()?;
        if version != INDEX_FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion {
                offset: VERSION_OFFSET,
                version,
            });
        }
        let flags = reader.u16()?;
        if flags != 0 {
            return Err(CodecError::UnknownFlags {
                offset: FLAGS_OFFSET,
                flags,
            });
        }

        Ok(Self {
            version,
            flags,
            dimension: reader.u32()?,
            count: reader.u64()?,
        })
    }
}

/// Peek at the header of an encoded stream without decoding entries
pub fn read_header(bytes: &[u8]) -> CodecResult<IndexHeader> {
    IndexHeader::read_from(&mut SliceReader::new(bytes))
}

/// Bounds-checked little-endian reader over a byte slice.
///
/// Every read checks the remaining length first and reports a shortfall as
/// [`CodecError::Truncated`] at the current offset.
pub(crate) struct SliceReader<'a> {
    data: &'a [u8],
    cursor: Cursor<&'a [u8]>,
}

impl<'a> SliceReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: Cursor::new(data),
        }
    }

    pub(crate) fn offset(&self) -> u64 {
        self.cursor.position()
    }

    pub(crate) fn remaining(&self) -> u64 {
        (self.data.len() as u64).saturating_sub(self.offset())
    }

    pub(crate) fn ensure(&self, needed: usize) -> CodecResult<()> {
        let available = self.remaining();
        if (needed as u64) > available {
            return Err(CodecError::Truncated {
                offset: self.offset(),
                needed: needed as u64,
                available,
            });
        }
        Ok(())
    }

    pub(crate) fn u16(&mut self) -> CodecResult<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub(crate) fn u32(&mut self) -> CodecResult<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub(crate) fn u64(&mut self) -> CodecResult<u64> {
        self.ensure(8)?;
        Ok(self.cursor.read_u64::<LittleEndian>()?)
    }

    pub(crate) fn bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        self.ensure(len)?;
        let start = self.offset() as usize;
        self.cursor.set_position((start + len) as u64);
        Ok(&self.data[start..start + len])
    }

    pub(crate) fn f32_into(&mut self, out: &mut [f32]) -> CodecResult<()> {
        self.ensure(out.len().saturating_mul(4))?;
        self.cursor.read_f32_into::<LittleEndian>(out)?;
        Ok(())
    }
}
