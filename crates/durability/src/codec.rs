//! Index stream encoding and decoding
//!
//! See [`crate::format`] for the byte layout. Decoding validates every length
//! against the bytes actually present, so a corrupt count or identifier
//! length fails with `Truncated` instead of allocating.

use crate::error::{CodecError, CodecResult};
use crate::format::{IndexHeader, SliceReader, CHECKSUM_SIZE, DIMENSION_OFFSET};
use byteorder::{LittleEndian, WriteBytesExt};
use projdex_storage::EntryBuffer;
use std::io::Write;
use tracing::{debug, warn};

/// Writer adapter that feeds every byte through a CRC32 hasher
struct ChecksumWriter<W> {
    inner: W,
    hasher: crc32fast::Hasher,
}

impl<W: Write> ChecksumWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
        }
    }

    fn finish(mut self) -> std::io::Result<W> {
        let checksum = self.hasher.finalize();
        self.inner.write_u32::<LittleEndian>(checksum)?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Exact encoded size of `entries` in bytes
pub fn encoded_len(entries: &EntryBuffer) -> usize {
    let vector_bytes = entries.dimension() * std::mem::size_of::<f32>();
    let body: usize = entries
        .iter()
        .map(|e| 4 + e.identifier.len() + vector_bytes)
        .sum();
    crate::format::INDEX_HEADER_SIZE + body + CHECKSUM_SIZE
}

/// Stream `entries` to `writer` in insertion order.
///
/// # Errors
/// - `DimensionTooLarge` / `IdentifierTooLong` if a value does not fit its
///   u32 field. Nothing is written in that case.
/// - `Io` if the writer fails
pub fn encode_into<W: Write>(entries: &EntryBuffer, writer: W) -> CodecResult<()> {
    let dimension = u32::try_from(entries.dimension()).map_err(|_| {
        CodecError::DimensionTooLarge {
            dimension: entries.dimension(),
        }
    })?;
    if let Some(entry) = entries
        .iter()
        .find(|e| u32::try_from(e.identifier.len()).is_err())
    {
        return Err(CodecError::IdentifierTooLong {
            len: entry.identifier.len(),
        });
    }

    let mut out = ChecksumWriter::new(writer);
    IndexHeader::new(dimension, entries.len() as u64).write_to(&mut out)?;
    for entry in entries.iter() {
        out.write_u32::<LittleEndian>(entry.identifier.len() as u32)?;
        out.write_all(entry.identifier.as_bytes())?;
        for value in entry.vector {
            out.write_f32::<LittleEndian>(*value)?;
        }
    }
    out.finish()?.flush()?;

    debug!(count = entries.len(), dimension, "Encoded index");
    Ok(())
}

/// Encode `entries` into a new byte vector
pub fn encode(entries: &EntryBuffer) -> CodecResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(encoded_len(entries));
    encode_into(entries, &mut bytes)?;
    Ok(bytes)
}

/// Decode a complete index stream.
///
/// `expected_dimension` is the output dimension of the projection the caller
/// is configured with; a stream recorded at any other dimension is rejected.
///
/// # Errors
/// Any [`CodecError`] except `IdentifierTooLong` / `DimensionTooLarge`. All
/// but `Store` and `Io` carry the offset where validation failed.
pub fn decode(bytes: &[u8], expected_dimension: usize) -> CodecResult<EntryBuffer> {
    let result = decode_inner(bytes, expected_dimension);
    if let Err(e) = &result {
        warn!(error = %e, len = bytes.len(), "Rejected index stream");
    }
    result
}

fn decode_inner(bytes: &[u8], expected_dimension: usize) -> CodecResult<EntryBuffer> {
    let mut reader = SliceReader::new(bytes);
    let header = IndexHeader::read_from(&mut reader)?;

    if header.dimension as usize != expected_dimension {
        return Err(CodecError::DimensionMismatch {
            offset: DIMENSION_OFFSET,
            expected: expected_dimension,
            found: u64::from(header.dimension),
        });
    }
    let dimension = expected_dimension;

    // Every entry takes at least its length prefix and vector, so the bytes
    // present bound how many entries can follow.
    let min_entry = 4 + dimension * std::mem::size_of::<f32>();
    let plausible = reader.remaining() / min_entry as u64;
    let capacity = header.count.min(plausible) as usize;
    let mut entries = EntryBuffer::with_capacity(dimension, capacity);

    let mut vector = vec![0.0f32; dimension];
    for _ in 0..header.count {
        let id_len = reader.u32()? as usize;
        let id_offset = reader.offset();
        let id_bytes = reader.bytes(id_len)?;
        let identifier = std::str::from_utf8(id_bytes)
            .map_err(|_| CodecError::InvalidIdentifier { offset: id_offset })?;
        let vector_offset = reader.offset();
        reader.f32_into(&mut vector)?;
        if let Some(i) = vector.iter().position(|v| !v.is_finite()) {
            return Err(CodecError::NonFiniteValue {
                offset: vector_offset + (i * std::mem::size_of::<f32>()) as u64,
            });
        }
        entries.push(identifier, &vector)?;
    }

    let body_end = reader.offset();
    let remaining = reader.remaining();
    if remaining < CHECKSUM_SIZE as u64 {
        return Err(CodecError::Truncated {
            offset: body_end,
            needed: CHECKSUM_SIZE as u64,
            available: remaining,
        });
    }
    if remaining > CHECKSUM_SIZE as u64 {
        return Err(CodecError::TrailingBytes {
            offset: body_end + CHECKSUM_SIZE as u64,
            count: remaining - CHECKSUM_SIZE as u64,
        });
    }

    let stored = reader.u32()?;
    let computed = crc32fast::hash(&bytes[..body_end as usize]);
    if stored != computed {
        return Err(CodecError::ChecksumMismatch {
            offset: body_end,
            stored,
            computed,
        });
    }

    debug!(count = entries.len(), dimension, "Decoded index");
    Ok(entries)
}
