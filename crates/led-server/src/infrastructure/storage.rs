//! TOML configuration file loading.
//!
//! The server reads an optional config file named on the command line
//! (`--config /etc/led-server.toml`). Every key is optional; whatever the
//! file leaves out keeps its default, and command-line flags override the
//! file afterwards (see `main.rs` for the merge order). Example:
//!
//! ```toml
//! port = 8765
//! gpio_pin = 17
//! active_low = false
//! poll_interval_ms = 50
//! ```
//!
//! There is no save path. The file is written by the operator (or a deb
//! postinst), never by the server.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::ServerConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Loads a [`ServerConfig`] from `path`.
///
/// Returns `Ok(None)` when the file does not exist, so the caller can log
/// that defaults are in use and carry on.
///
/// # Errors
///
/// Returns [`StorageError::Io`] for file-system errors other than "not
/// found", and [`StorageError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<Option<ServerConfig>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let config: ServerConfig =
                toml::from_str(&content).map_err(|source| StorageError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(Some(config))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_missing_file_is_not_an_error() {
        // Arrange: a path that cannot exist exercises the NotFound branch.
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/led-server.toml");

        // Act
        let result = load_config(&path);

        // Assert
        assert!(matches!(result, Ok(None)), "absent file must mean defaults");
    }

    #[test]
    fn test_file_values_are_loaded() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("led_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("led-server.toml");
        std::fs::write(&path, "port = 9000\ngpio_pin = 27\n").unwrap();

        // Act
        let loaded = load_config(&path).unwrap().expect("file exists");

        // Assert: named keys taken from the file, the rest left at defaults.
        assert_eq!(loaded.port, 9000);
        assert_eq!(loaded.gpio_pin, 27);
        assert_eq!(loaded.poll_interval_ms, 50);
        assert_eq!(loaded.bind_address, "0.0.0.0");

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("led_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("led-server.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(StorageError::Parse { .. })));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_are_tolerated() {
        // Old configs may carry keys from other revisions; loading must not
        // reject them.
        let dir = std::env::temp_dir().join(format!("led_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("led-server.toml");
        std::fs::write(&path, "port = 8765\nsome_future_key = true\n").unwrap();

        let result = load_config(&path);

        assert!(result.is_ok(), "unknown keys must be ignored: {result:?}");

        std::fs::remove_dir_all(&dir).ok();
    }
}
