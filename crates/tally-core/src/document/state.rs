use std::collections::HashMap;

use tally_engine::engine::CellStore;

use super::eval::CellValue;
use crate::settings::Settings;

/// UI-agnostic document state: cell contents plus their computed values.
#[derive(Debug, Clone)]
pub struct Document {
    /// Contents and the dependency graph between cells
    pub(crate) store: CellStore,
    /// Computed value of every non-empty cell, keyed by normalized name
    pub(crate) values: HashMap<String, CellValue>,
    /// Whether the document changed since it was last marked saved
    pub(crate) modified: bool,
    pub(crate) settings: Settings,
}

impl Document {
    /// Create an empty document with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create an empty document; names are normalized per `settings`.
    pub fn with_settings(settings: Settings) -> Self {
        Document {
            store: CellStore::with_normalization(settings.names.normalize),
            values: HashMap::new(),
            modified: false,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read-only access to the underlying cell store.
    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Remove every cell, value and dependency.
    pub fn clear(&mut self) {
        self.store.clear();
        self.values.clear();
        self.modified = true;
    }

    /// Clear the modified flag, e.g. after the caller persisted the document.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
