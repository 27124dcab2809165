// Caller-owned cache of parsed OpenAPI documents
use crate::error::SchemaGenResult;
use crate::loader::document::OpenApiDocument;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Parsed documents keyed by the path they were loaded from
#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: DashMap<PathBuf, Arc<OpenApiDocument>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached document for `path`, loading it on first access.
    /// A failed load leaves the cache untouched.
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> SchemaGenResult<Arc<OpenApiDocument>> {
        let path = path.as_ref();
        if let Some(document) = self.cached(path) {
            debug!(path = %path.display(), "Document cache hit");
            return Ok(document);
        }

        let document = Arc::new(OpenApiDocument::from_file(path)?);
        let entry = self
            .documents
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::clone(&document));
        Ok(Arc::clone(entry.value()))
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.documents.contains_key(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Drop every cached document
    pub fn clear(&self) {
        self.documents.clear();
    }

    fn cached(&self, path: &Path) -> Option<Arc<OpenApiDocument>> {
        self.documents.get(path).map(|entry| Arc::clone(entry.value()))
    }
}
