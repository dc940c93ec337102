//! Whole-file persistence helpers

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("index path has no file name: {}", path.display()),
        )
    })?;
    let mut temp = name.to_os_string();
    temp.push(".tmp");
    Ok(path.with_file_name(temp))
}

/// Atomically replace `path` with `bytes`.
///
/// Writes a `.tmp` sibling, syncs it, then renames it over `path`. A crash
/// leaves either the old file or the new one, never a partial write.
pub fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp = temp_path(path)?;

    let result = (|| -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp);
        return result;
    }

    // Make the rename durable where the platform allows opening directories.
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote index file");
    Ok(())
}

/// Read the whole file at `path`
pub fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read index file");
    Ok(bytes)
}
