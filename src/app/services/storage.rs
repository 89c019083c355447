use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use crate::app::domain::Document;
use crate::app::infrastructure::error::{AppError, Result};

/// A single durable key-value entry holding the serialized document.
pub trait StorageSlot {
    /// Current value, or None when nothing has been stored or it can't be read.
    fn read(&self) -> Option<String>;

    fn write(&mut self, value: &str) -> Result<()>;
}

/// Returns the storage directory path: data_dir/page-forge/
pub fn storage_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("page-forge");
    path
}

/// Slot backed by one JSON file named after the key.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Slot for `key` in the default storage directory.
    pub fn new(key: &str) -> Self {
        Self::in_dir(storage_dir(), key)
    }

    pub fn in_dir(dir: PathBuf, key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("Failed to create storage dir: {}", e))
            })?;
        }
        fs::write(&self.path, value)
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

/// In-memory slot. Clones share the same cell, so a test can keep one handle
/// while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Rc<RefCell<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: Rc::new(RefCell::new(Some(value.to_string()))),
        }
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        *self.value.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}

pub fn encode_document(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string(doc)?)
}

/// Decode a stored document. Corrupt or structurally invalid values are
/// treated as "no saved state".
pub fn decode_document(raw: &str) -> Option<Document> {
    match serde_json::from_str::<Document>(raw) {
        Ok(doc) if doc.is_well_formed() => Some(doc),
        Ok(_) => {
            tracing::warn!("stored document has no pages, ignoring it");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored document is unreadable, ignoring it");
            None
        }
    }
}
