use crate::domain::model::{Entity, Projection};
use crate::utils::error::{BookingError, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

/// Storage-agnostic persistence contract for one entity kind.
pub trait Repository<T: Entity>: Send + Sync {
    /// Fails with `DuplicateId` when the id is already taken.
    fn create(&self, entity: T) -> Result<()>;

    fn read(&self, id: &str) -> Option<T>;

    /// Replaces the stored entity wholesale. Fails with `NotFound` when absent.
    fn update(&self, entity: T) -> Result<()>;

    fn delete(&self, id: &str) -> Result<()>;

    fn list_all(&self) -> Vec<T>;

    fn len(&self) -> usize {
        self.list_all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whole-collection snapshot encoder/decoder.
pub trait Serializer: Send + Sync {
    /// Format name; snapshot targets pick a serializer by file extension.
    fn format(&self) -> &'static str;

    fn encode<T: Projection>(&self, data: &[T]) -> Result<String>;

    fn decode(&self, content: &str) -> Result<Vec<serde_json::Value>>;

    /// Writes `data` to `path`, overwriting any previous content.
    fn to_file<T: Projection>(&self, data: &[T], path: &Path) -> Result<()> {
        let content = self.encode(data)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                BookingError::serialization(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            tracing::error!("Error saving to {}: {}", path.display(), e);
            BookingError::serialization(format!("Failed to save to {}: {}", path.display(), e))
        })?;

        tracing::info!("Saved {} {} records to {}", data.len(), self.format(), path.display());
        Ok(())
    }

    fn from_file(&self, path: &Path) -> Result<Vec<serde_json::Value>> {
        let content = fs::read_to_string(path).map_err(|e| {
            tracing::error!("Error loading from {}: {}", path.display(), e);
            BookingError::serialization(format!("Failed to load from {}: {}", path.display(), e))
        })?;

        let records = self.decode(&content)?;
        tracing::debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
