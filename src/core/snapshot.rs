use crate::adapters::json::JsonSerializer;
use crate::adapters::xml::XmlSerializer;
use crate::config::TomlConfig;
use crate::domain::model::{Booking, Projection, Property, User};
use crate::domain::ports::Serializer;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::file_extension;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Xml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.to_str().and_then(file_extension).as_deref() {
            Some("json") => Ok(SnapshotFormat::Json),
            Some("xml") => Ok(SnapshotFormat::Xml),
            _ => Err(BookingError::serialization(format!(
                "cannot tell snapshot format of {} (expected .json or .xml)",
                path.display()
            ))),
        }
    }
}

/// One snapshot file and the format it is written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTarget {
    pub path: PathBuf,
    pub format: SnapshotFormat,
}

impl SnapshotTarget {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = SnapshotFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn write<T: Projection>(&self, data: &[T]) -> Result<()> {
        match self.format {
            SnapshotFormat::Json => JsonSerializer.to_file(data, &self.path),
            SnapshotFormat::Xml => XmlSerializer.to_file(data, &self.path),
        }
    }

    pub fn read(&self) -> Result<Vec<serde_json::Value>> {
        match self.format {
            SnapshotFormat::Json => JsonSerializer.from_file(&self.path),
            SnapshotFormat::Xml => XmlSerializer.from_file(&self.path),
        }
    }
}

/// Writes full collection snapshots, overwriting previous files.
#[derive(Debug, Clone, Default)]
pub struct SnapshotWriter {
    users: Option<SnapshotTarget>,
    properties: Option<SnapshotTarget>,
    bookings: Option<SnapshotTarget>,
}

impl SnapshotWriter {
    pub fn new(users: SnapshotTarget, bookings: SnapshotTarget) -> Self {
        Self {
            users: Some(users),
            properties: None,
            bookings: Some(bookings),
        }
    }

    /// A writer that never touches the filesystem.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_properties(mut self, properties: SnapshotTarget) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        if !config.snapshot.enabled {
            return Ok(Self::disabled());
        }

        let mut writer = Self::new(
            SnapshotTarget::new(config.users_path())?,
            SnapshotTarget::new(config.bookings_path())?,
        );
        if let Some(path) = config.properties_path() {
            writer = writer.with_properties(SnapshotTarget::new(path)?);
        }
        Ok(writer)
    }

    pub fn is_enabled(&self) -> bool {
        self.users.is_some() || self.properties.is_some() || self.bookings.is_some()
    }

    pub fn write(
        &self,
        users: &[User],
        properties: &[Property],
        bookings: &[Booking],
    ) -> Result<()> {
        if let Some(target) = &self.users {
            target.write(users)?;
        }
        if let Some(target) = &self.properties {
            target.write(properties)?;
        }
        if let Some(target) = &self.bookings {
            target.write(bookings)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Address;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SnapshotFormat::from_path(Path::new("a/users.JSON")).unwrap(),
            SnapshotFormat::Json
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("bookings.xml")).unwrap(),
            SnapshotFormat::Xml
        );
        assert!(matches!(
            SnapshotFormat::from_path(Path::new("bookings.yaml")).unwrap_err(),
            BookingError::SerializationFailed { .. }
        ));
    }

    #[test]
    fn test_write_overwrites_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let target = SnapshotTarget::new(temp_dir.path().join("nested/users.json")).unwrap();

        let mut user = User::new(
            "Alice",
            "Smith",
            "alice@example.com",
            Address::new("1 Main St", "Springfield", "12345"),
        );
        user.user_id = "U1".to_string();
        let mut second = user.clone();
        second.user_id = "U2".to_string();

        target.write(&[user.clone(), second]).unwrap();
        assert_eq!(target.read().unwrap().len(), 2);

        target.write(&[user]).unwrap();
        let records = target.read().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["user_id"], "U1");
    }

    #[test]
    fn test_disabled_config_writes_nothing() {
        let mut config = TomlConfig::default();
        config.snapshot.enabled = false;

        let writer = SnapshotWriter::from_config(&config).unwrap();
        assert!(!writer.is_enabled());
        assert!(writer.write(&[], &[], &[]).is_ok());
    }
}
