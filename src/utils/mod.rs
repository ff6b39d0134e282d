use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Ensures that the directory for the given file path exists
///
/// Extracts the directory part of a file path and creates it if missing,
/// so the SQLite file can live under a data/ directory that may not exist
/// on first run.
pub fn ensure_directory_exists(file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_directory_exists_creates_parent() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/file.db");

        ensure_directory_exists(nested.to_str().unwrap()).unwrap();
        assert!(nested.parent().unwrap().exists());
    }

    #[test]
    fn test_format_datetime() {
        let dt = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(format_datetime(dt), "1970-01-01 00:00:00");
    }
}
