//! Utility functions and helpers for the CityInfo application

use std::path::Path;

use anyhow::Result;

/// Trim a filter parameter, treating blank values as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Ensure a directory exists, creating it if necessary
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank(Some("  Paris ")), Some("Paris".to_string()));
        assert_eq!(non_blank(Some("Paris")), Some("Paris".to_string()));
    }

    #[test]
    fn test_non_blank_drops_empty() {
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_ensure_dir_exists() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
