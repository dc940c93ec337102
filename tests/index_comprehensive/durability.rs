//! Persistence Tests
//!
//! Save/load through writers, readers and files, and rejection of damaged
//! streams without touching the loaded index.

use crate::*;
use std::io::Cursor;
use tempfile::TempDir;

fn populated() -> Index {
    let index = scenario_index();
    index.add("a", &feature(1.0, 2.0)).unwrap();
    index.add("b", &feature(3.0, 4.0)).unwrap();
    index.add("ünïcødé", &feature(-0.5, 0.25)).unwrap();
    index
}

fn saved_bytes(index: &Index) -> Vec<u8> {
    let mut bytes = Vec::new();
    index.save(&mut bytes).unwrap();
    bytes
}

fn all_entries(index: &Index) -> Vec<(String, f32)> {
    index
        .search(&feature(0.0, 0.0), usize::MAX)
        .unwrap()
        .into_iter()
        .map(|r| (r.identifier, r.distance))
        .collect()
}

// =============================================================================
// WRITER / READER ROUND TRIP
// =============================================================================

#[test]
fn test_save_load_roundtrip() {
    let source = populated();
    let bytes = saved_bytes(&source);

    let target = scenario_index();
    target.load(Cursor::new(&bytes)).unwrap();

    assert_eq!(target.count().unwrap(), 3);
    assert_eq!(all_entries(&target), all_entries(&source));
}

#[test]
fn test_load_replaces_existing_entries() {
    let bytes = saved_bytes(&populated());

    let target = scenario_index();
    target.add("stale", &feature(100.0, 100.0)).unwrap();
    target.load(Cursor::new(&bytes)).unwrap();

    assert_eq!(target.count().unwrap(), 3);
    assert!(all_entries(&target).iter().all(|(id, _)| id != "stale"));
}

#[test]
fn test_add_after_load_appends() {
    let target = scenario_index();
    target.load(Cursor::new(saved_bytes(&populated()))).unwrap();
    target.add("c", &feature(1.0, 2.0)).unwrap();

    let hits = target.search(&feature(1.0, 2.0), 2).unwrap();
    assert_eq!(pairs(&hits), vec![("a", 0.0), ("c", 0.0)]);
}

#[test]
fn test_empty_index_roundtrip() {
    let bytes = saved_bytes(&scenario_index());

    let target = populated();
    target.load(Cursor::new(bytes)).unwrap();
    assert_eq!(target.count().unwrap(), 0);
}

#[test]
fn test_saved_header() {
    let bytes = saved_bytes(&populated());
    assert_eq!(&bytes[0..4], b"PDXI");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 1);
    assert_eq!(u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]), 2);
}

// =============================================================================
// REJECTED STREAMS
// =============================================================================

#[test]
fn test_load_garbage_keeps_state() {
    let index = populated();
    let before = all_entries(&index);

    let err = index.load(Cursor::new(b"definitely not an index".to_vec())).unwrap_err();
    assert!(err.is_corrupt_data());
    assert!(matches!(err, Error::CorruptData { offset: 0, .. }));
    assert_eq!(all_entries(&index), before);
}

#[test]
fn test_load_truncated_keeps_state() {
    let bytes = saved_bytes(&populated());
    let index = populated();
    index.add("extra", &feature(7.0, 7.0)).unwrap();
    let before = all_entries(&index);

    for cut in [5, 20, 30, bytes.len() - 1] {
        let err = index.load(Cursor::new(&bytes[..cut])).unwrap_err();
        assert!(err.is_corrupt_data(), "cut at {} gave {:?}", cut, err);
    }
    assert_eq!(all_entries(&index), before);
}

#[test]
fn test_load_wrong_dimension_is_corrupt() {
    init_tracing();
    let wide = Index::builder()
        .dimensions(4, 3)
        .matrix(ProjectionMatrix::truncating(4, 3).unwrap())
        .build()
        .unwrap();
    wide.add("a", &[1.0, 2.0, 3.0, 4.0]).unwrap();
    let bytes = saved_bytes(&wide);

    let index = populated();
    let err = index.load(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, Error::CorruptData { offset: 8, .. }));
    assert_eq!(index.count().unwrap(), 3);
}

#[test]
fn test_load_flipped_byte_is_corrupt() {
    let mut bytes = saved_bytes(&populated());
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x01;

    let index = scenario_index();
    let err = index.load(Cursor::new(bytes)).unwrap_err();
    assert!(err.is_corrupt_data());
    assert_eq!(index.count().unwrap(), 0);
}

#[test]
fn test_load_non_finite_value_is_corrupt() {
    // First entry "a": header (20), length prefix (4), identifier (1).
    const FIRST_VECTOR: usize = 25;

    for bad in [f32::NAN, f32::INFINITY] {
        let mut bytes = saved_bytes(&populated());
        bytes[FIRST_VECTOR..FIRST_VECTOR + 4].copy_from_slice(&bad.to_le_bytes());
        let body_end = bytes.len() - 4;
        let crc = crc32fast::hash(&bytes[..body_end]);
        bytes[body_end..].copy_from_slice(&crc.to_le_bytes());

        let index = scenario_index();
        index.add("kept", &feature(7.0, 7.0)).unwrap();
        let err = index.load(Cursor::new(bytes)).unwrap_err();
        assert!(
            matches!(err, Error::CorruptData { offset, .. } if offset == FIRST_VECTOR as u64),
            "{:?}",
            err
        );
        assert_eq!(pairs(&index.search(&feature(7.0, 7.0), 5).unwrap()), vec![("kept", 0.0)]);
    }
}

#[test]
fn test_load_reader_failure_is_io() {
    struct FailingReader;
    impl std::io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    let index = populated();
    let err = index.load(FailingReader).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe));
    assert_eq!(index.count().unwrap(), 3);
}

#[test]
fn test_save_writer_failure_is_io() {
    struct FailingWriter;
    impl std::io::Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let err = populated().save(FailingWriter).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

// =============================================================================
// FILES
// =============================================================================

#[test]
fn test_save_to_path_and_load_from_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photos.pdx");

    let source = populated();
    source.save_to_path(&path).unwrap();

    let target = scenario_index();
    target.load_from_path(&path).unwrap();
    assert_eq!(all_entries(&target), all_entries(&source));
}

#[test]
fn test_save_to_path_overwrites() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photos.pdx");

    populated().save_to_path(&path).unwrap();
    scenario_index().save_to_path(&path).unwrap();

    let target = populated();
    target.load_from_path(&path).unwrap();
    assert_eq!(target.count().unwrap(), 0);
}

#[test]
fn test_load_from_missing_path_is_io() {
    let dir = TempDir::new().unwrap();
    let index = populated();

    let err = index.load_from_path(dir.path().join("absent.pdx")).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    assert_eq!(index.count().unwrap(), 3);
}

#[test]
fn test_load_if_exists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photos.pdx");

    let index = scenario_index();
    assert!(!index.load_if_exists(&path).unwrap());
    assert_eq!(index.count().unwrap(), 0);

    populated().save_to_path(&path).unwrap();
    assert!(index.load_if_exists(&path).unwrap());
    assert_eq!(index.count().unwrap(), 3);
}

#[test]
fn test_load_if_exists_still_rejects_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photos.pdx");
    std::fs::write(&path, b"PDXI\x07\x00").unwrap();

    let index = populated();
    assert!(index.load_if_exists(&path).unwrap_err().is_corrupt_data());
    assert_eq!(index.count().unwrap(), 3);
}

#[test]
fn test_path_operations_require_ready() {
    let dir = TempDir::new().unwrap();
    let index = Index::uninitialized(IndexConfig::new(4, 2).unwrap()).unwrap();

    assert!(index
        .save_to_path(dir.path().join("x.pdx"))
        .unwrap_err()
        .is_not_initialized());
    assert!(index
        .load_if_exists(dir.path().join("x.pdx"))
        .unwrap_err()
        .is_not_initialized());
    assert!(!dir.path().join("x.pdx").exists());
}
