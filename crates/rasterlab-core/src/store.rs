//! The name-keyed buffer registry.
//!
//! The [`BufferStore`] is the engine's sole mutable shared state. Every
//! operation reads operands from it by name and writes its result back under
//! a target name once the computation has fully succeeded. A buffer has no
//! identity outside the store.

use std::collections::HashMap;

use tracing::debug;

use crate::{EngineError, RasterBuffer};

/// Name-keyed registry owning all raster buffers.
///
/// Inserting under an existing name overwrites. Entries are removed only by
/// the compositing engine when it cleans up a merged preview, or by an
/// explicit [`BufferStore::remove`].
#[derive(Debug, Default)]
pub struct BufferStore {
    buffers: HashMap<String, RasterBuffer>,
}

impl BufferStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a buffer is registered under `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.buffers.contains_key(name)
    }

    /// Register a decoded pixel grid under `name`.
    ///
    /// The grid must be well formed: non-empty, with channel data matching
    /// the declared extents. This is the only entry point that validates
    /// shape; transforms inherit it from their operands.
    pub fn load(&mut self, name: &str, buffer: RasterBuffer) -> Result<(), EngineError> {
        if buffer.is_empty() {
            return Err(EngineError::InvalidParameter(format!(
                "cannot load empty buffer `{name}`"
            )));
        }
        if buffer.pixels.len() != (buffer.height * buffer.width * 3) as usize {
            return Err(EngineError::InvalidParameter(format!(
                "pixel data for `{name}` does not match {}x{} extents",
                buffer.height, buffer.width
            )));
        }
        self.insert(name, buffer);
        Ok(())
    }

    /// Borrow the buffer registered under `name`.
    pub fn get(&self, name: &str) -> Result<&RasterBuffer, EngineError> {
        self.buffers
            .get(name)
            .ok_or_else(|| EngineError::BufferNotFound(name.to_string()))
    }

    /// Insert a computed buffer, overwriting any existing entry.
    pub fn insert(&mut self, name: &str, buffer: RasterBuffer) {
        debug!(name, height = buffer.height, width = buffer.width, "store insert");
        self.buffers.insert(name.to_string(), buffer);
    }

    /// Remove and return the buffer registered under `name`.
    pub fn remove(&mut self, name: &str) -> Option<RasterBuffer> {
        debug!(name, "store remove");
        self.buffers.remove(name)
    }

    /// Number of registered buffers.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the store holds no buffers.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(h: u32, w: u32) -> RasterBuffer {
        RasterBuffer::filled(h, w, (128, 128, 128))
    }

    #[test]
    fn test_load_and_exists() {
        let mut store = BufferStore::new();
        assert!(!store.exists("img"));
        store.load("img", gray(2, 2)).unwrap();
        assert!(store.exists("img"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_rejects_empty() {
        let mut store = BufferStore::new();
        let err = store.load("img", RasterBuffer::zeroed(0, 4)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_rejects_shape_mismatch() {
        let mut store = BufferStore::new();
        let bad = RasterBuffer {
            height: 2,
            width: 2,
            pixels: vec![0; 9],
        };
        let err = store.load("img", bad).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
    }

    #[test]
    fn test_get_missing() {
        let store = BufferStore::new();
        let err = store.get("absent").unwrap_err();
        assert!(matches!(err, EngineError::BufferNotFound(_)));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut store = BufferStore::new();
        store.insert("img", gray(2, 2));
        store.insert("img", gray(4, 4));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("img").unwrap().height, 4);
    }

    #[test]
    fn test_remove() {
        let mut store = BufferStore::new();
        store.insert("img", gray(2, 2));
        let removed = store.remove("img").unwrap();
        assert_eq!(removed.height, 2);
        assert!(!store.exists("img"));
        assert!(store.remove("img").is_none());
    }
}
