//! Error types for the autocomplete widget and species lookup.

use std::path::PathBuf;

use plumage_core::{CoreError, DomError, SelectorError};

/// Result type alias for Plumage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while attaching widgets or loading data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A document operation failed.
    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    /// A selector could not be parsed.
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// The element cannot host an autocomplete widget.
    #[error("Cannot attach autocomplete: {0}")]
    Attach(String),

    /// A file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML data could not be deserialized.
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON data could not be deserialized.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A settings file has an extension other than `.toml` or `.json`.
    #[error("Unsupported file format '{path}': expected .toml or .json")]
    UnsupportedFormat { path: PathBuf },
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Dom(err) => Self::Dom(err),
            CoreError::Selector(err) => Self::Selector(err),
        }
    }
}

impl Error {
    /// Create an attach error.
    pub fn attach(message: impl Into<String>) -> Self {
        Self::Attach(message.into())
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Deserialize a TOML or JSON file, chosen by extension.
pub(crate) fn read_structured<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(toml::from_str(&content)?),
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(serde_json::from_str(&content)?),
        _ => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(DomError::InvalidNode);
        assert_eq!(err.to_string(), "Document error: Invalid or removed node ID");

        let err = Error::attach("input has no parent");
        assert_eq!(err.to_string(), "Cannot attach autocomplete: input has no parent");
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;

        let err = Error::io(
            "/missing/birds.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/missing/birds.toml"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birds.yaml");
        std::fs::write(&path, "a: b").unwrap();

        let result: Result<serde_json::Value> = read_structured(&path);
        assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    }
}
