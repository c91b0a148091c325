use crate::utils::error::{BookingError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> BookingError {
    BookingError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

/// The lowercase extension of `file`, if it has one.
pub fn file_extension(file: &str) -> Option<String> {
    std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[&str],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        match file_extension(file) {
            Some(extension) if allowed_set.contains(extension.as_str()) => {}
            Some(extension) => {
                return Err(invalid(
                    field_name,
                    file,
                    format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                ));
            }
            None => {
                return Err(invalid(
                    field_name,
                    file,
                    "File has no extension or invalid filename",
                ));
            }
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Expected one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("snapshot.output_path", "./data").is_ok());
        assert!(validate_path("snapshot.output_path", "").is_err());
        assert!(validate_path("snapshot.output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = ["users.json", "bookings.XML"];
        assert!(validate_file_extensions("snapshot", &files, &["json", "xml"]).is_ok());

        assert!(validate_file_extensions("snapshot", &["users.csv"], &["json", "xml"]).is_err());
        assert!(validate_file_extensions("snapshot", &["users"], &["json", "xml"]).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("logging.level", "debug", &["info", "debug"]).is_ok());
        let err = validate_one_of("logging.level", "loud", &["info", "debug"]).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("name", "Cozy").is_ok());
        assert!(validate_non_empty_string("name", "   ").is_err());
    }
}
