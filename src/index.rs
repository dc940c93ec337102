//! The projected similarity index.
//!
//! This module provides [`Index`], the entry point for every operation:
//! project and store feature vectors, query nearest neighbours, and persist
//! the stored entries.

use crate::builder::IndexBuilder;
use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use projdex_core::{Entry, IndexConfig, SearchResult};
use projdex_durability::{decode, encode, encode_into, read_file, write_file};
use projdex_projection::{Projection, ProjectionMatrix};
use projdex_search::{create_backend, SearchBackend};
use projdex_storage::EntryStore;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A similarity index over projected feature vectors.
///
/// An index starts `Uninitialized` when built without a matrix and becomes
/// `Ready` once [`Index::initialize`] installs one. Every data operation
/// requires `Ready` and fails with [`Error::NotInitialized`] before that.
///
/// `Index` is `Send + Sync`; share it with `Arc<Index>`. Searches run on
/// snapshots and never wait on writers. `add`, `add_batch`, `clear` and the
/// load family are serialized with each other.
///
/// # Example
///
/// ```ignore
/// use projdex::prelude::*;
///
/// let index = Index::builder()
///     .dimensions(4, 2)
///     .matrix(ProjectionMatrix::truncating(4, 2)?)
///     .build()?;
///
/// index.add("a", &[1.0, 2.0, 0.0, 0.0])?;
/// let hits = index.search(&[1.0, 2.0, 0.0, 0.0], 1)?;
/// assert_eq!(hits[0].identifier, "a");
/// ```
pub struct Index {
    config: IndexConfig,
    projection: OnceCell<Arc<Projection>>,
    store: EntryStore,
    backend: Box<dyn SearchBackend>,
    /// Serializes every mutation together with its backend hook
    writer: Mutex<()>,
}

impl Index {
    /// Create a ready index with the default 1792 → 256 dimensions.
    ///
    /// # Errors
    /// - `InvalidMatrix` if `matrix` is not 1792 × 256 or holds non-finite values
    pub fn new(matrix: ProjectionMatrix) -> Result<Self> {
        Self::builder().matrix(matrix).build()
    }

    /// Create a builder for index configuration.
    pub fn builder() -> IndexBuilder {
        IndexBuilder::new()
    }

    /// Create an index without a projection.
    ///
    /// Data operations fail with `NotInitialized` until [`Index::initialize`]
    /// succeeds.
    ///
    /// # Errors
    /// - `InvalidArgument` if either dimension in `config` is zero
    pub fn uninitialized(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: EntryStore::new(config.output_dimension),
            backend: create_backend(config.backend),
            projection: OnceCell::new(),
            writer: Mutex::new(()),
            config,
        })
    }

    /// Install the projection, moving the index to `Ready`.
    ///
    /// # Errors
    /// - `InvalidArgument` if the index is already initialized
    /// - `InvalidMatrix` if `matrix` does not match the configured dimensions;
    ///   the index stays uninitialized
    pub fn initialize(&self, matrix: ProjectionMatrix) -> Result<()> {
        if self.is_ready() {
            return Err(Error::InvalidArgument(
                "index is already initialized".to_string(),
            ));
        }
        let projection = Projection::new(
            matrix,
            self.config.input_dimension,
            self.config.output_dimension,
        )?;
        self.projection
            .set(Arc::new(projection))
            .map_err(|_| Error::InvalidArgument("index is already initialized".to_string()))?;

        info!(
            input_dimension = self.config.input_dimension,
            output_dimension = self.config.output_dimension,
            backend = self.backend.name(),
            "Index initialized"
        );
        Ok(())
    }

    /// Check if a projection is installed.
    pub fn is_ready(&self) -> bool {
        self.projection.get().is_some()
    }

    /// Configuration this index was created with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    fn projection(&self) -> Result<&Projection> {
        self.projection
            .get()
            .map(|p| p.as_ref())
            .ok_or(Error::NotInitialized)
    }

    /// Project `features` and store the result under `identifier`.
    ///
    /// Identifiers need not be unique; adding the same one twice stores two
    /// entries.
    ///
    /// # Errors
    /// - `NotInitialized`
    /// - `DimensionMismatch` if `features.len()` differs from the input dimension
    /// - `InvalidArgument` if `features` holds NaN or an infinity
    pub fn add(&self, identifier: &str, features: &[f32]) -> Result<()> {
        let reduced = self.projection()?.project(features)?;

        let _writer = self.writer.lock();
        let position = self.store.append(identifier, &reduced)?;
        self.backend.on_append(position, &reduced);

        debug!(identifier, position, "Entry added");
        Ok(())
    }

    /// Project and store every item, or none of them.
    ///
    /// All items are projected before anything is stored, so a bad item
    /// anywhere in the batch leaves the index unchanged.
    ///
    /// # Errors
    /// Same as [`Index::add`], for the first failing item.
    pub fn add_batch<I, S, V>(&self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: AsRef<[f32]>,
    {
        let projection = self.projection()?;
        let entries = items
            .into_iter()
            .map(|(identifier, features)| -> Result<Entry> {
                Ok(Entry::new(identifier, projection.project(features.as_ref())?))
            })
            .collect::<Result<Vec<_>>>()?;

        let _writer = self.writer.lock();
        let positions = self.store.append_batch(entries)?;
        let snapshot = self.store.entries();
        for position in positions.clone() {
            if let Some(vector) = snapshot.vector(position) {
                self.backend.on_append(position, vector);
            }
        }

        debug!(added = positions.len(), total = snapshot.len(), "Batch added");
        Ok(positions.len())
    }

    /// Find the `k` stored entries closest to `features`.
    ///
    /// Distance is the squared Euclidean distance between reduced vectors.
    /// Results are sorted ascending; entries at equal distance keep insertion
    /// order. At most `min(k, count)` results are returned and an empty index
    /// returns none.
    ///
    /// # Errors
    /// - `NotInitialized`
    /// - `InvalidArgument` if `k == 0` or `features` holds NaN or an infinity
    /// - `DimensionMismatch` if `features.len()` differs from the input dimension
    pub fn search(&self, features: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        let projection = self.projection()?;
        if k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".to_string()));
        }
        let query = projection.project(features)?;

        let snapshot = self.store.entries();
        let results: Vec<SearchResult> = self
            .backend
            .search(&snapshot, &query, k)
            .into_iter()
            .filter_map(|n| {
                snapshot
                    .identifier(n.position)
                    .map(|id| SearchResult::new(id, n.distance))
            })
            .collect();

        debug!(k, hits = results.len(), scanned = snapshot.len(), "Search completed");
        Ok(results)
    }

    /// Remove every entry.
    ///
    /// # Errors
    /// - `NotInitialized`
    pub fn clear(&self) -> Result<()> {
        self.projection()?;

        let _writer = self.writer.lock();
        self.store.clear();
        self.backend.rebuild(&self.store.entries());

        info!("Index cleared");
        Ok(())
    }

    /// Number of stored entries.
    ///
    /// # Errors
    /// - `NotInitialized`
    pub fn count(&self) -> Result<usize> {
        self.projection()?;
        Ok(self.store.count())
    }

    /// Check if no entries are stored.
    ///
    /// # Errors
    /// - `NotInitialized`
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.count()? == 0)
    }

    /// Write every entry to `writer`.
    ///
    /// Saves a consistent snapshot; concurrent adds are not included.
    ///
    /// # Errors
    /// - `NotInitialized`
    /// - `Io` if the writer fails
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        self.projection()?;
        let snapshot = self.store.entries();
        encode_into(&snapshot, writer)?;
        info!(count = snapshot.len(), "Index saved");
        Ok(())
    }

    /// Replace every entry with the contents of `reader`.
    ///
    /// The stream is read and validated in full before anything changes; on
    /// any error the current entries are kept.
    ///
    /// # Errors
    /// - `NotInitialized`
    /// - `CorruptData` if the stream fails validation, including a stream
    ///   written at another output dimension
    /// - `Io` if the reader fails
    pub fn load<R: Read>(&self, mut reader: R) -> Result<()> {
        self.projection()?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.load_bytes(&bytes)
    }

    /// Atomically write every entry to the file at `path`.
    ///
    /// # Errors
    /// Same as [`Index::save`].
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.projection()?;
        let snapshot = self.store.entries();
        let bytes = encode(&snapshot)?;
        write_file(path, &bytes)?;
        info!(path = %path.display(), count = snapshot.len(), "Index saved");
        Ok(())
    }

    /// Replace every entry with the contents of the file at `path`.
    ///
    /// # Errors
    /// Same as [`Index::load`]; a missing file is an `Io` error.
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.projection()?;
        let bytes = read_file(path)?;
        self.load_bytes(&bytes)?;
        debug!(path = %path.display(), "Loaded from file");
        Ok(())
    }

    /// Load from `path` if the file exists.
    ///
    /// Returns `false` and leaves the index untouched when there is no file.
    ///
    /// # Errors
    /// Same as [`Index::load_from_path`], except that a missing file is not an
    /// error.
    pub fn load_if_exists(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        self.projection()?;
        match read_file(path) {
            Ok(bytes) => {
                self.load_bytes(&bytes)?;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No index file to load");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<()> {
        let buffer = decode(bytes, self.config.output_dimension)?;
        let count = buffer.len();

        let _writer = self.writer.lock();
        self.store.replace(buffer)?;
        self.backend.rebuild(&self.store.entries());

        info!(count, bytes = bytes.len(), "Index loaded");
        Ok(())
    }

    /// Current size and shape of the index.
    ///
    /// # Errors
    /// - `NotInitialized`
    pub fn stats(&self) -> Result<IndexStats> {
        self.projection()?;
        let snapshot = self.store.entries();
        Ok(IndexStats {
            count: snapshot.len(),
            input_dimension: self.config.input_dimension,
            output_dimension: self.config.output_dimension,
            backend: self.backend.name(),
            arena_bytes: snapshot.heap_bytes(),
        })
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("config", &self.config)
            .field("ready", &self.is_ready())
            .field("count", &self.store.count())
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// Index statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    /// Stored entries
    pub count: usize,
    /// Feature vector length
    pub input_dimension: usize,
    /// Reduced vector length
    pub output_dimension: usize,
    /// Search backend name
    pub backend: &'static str,
    /// Approximate heap bytes held by the entry arena
    pub arena_bytes: usize,
}
