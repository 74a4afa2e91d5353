//! Error conversion helpers for file loading
//!
//! Attach the offending path to I/O and deserialization errors.

use std::fmt::Display;
use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Adds path context to an I/O error.
///
/// ```ignore
/// let text = fs.read_to_string(&path).with_path_context("read tree", &path)?;
/// ```
pub trait IoResultExt<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Turns a deserializer error into [`ApplicationError::Parse`] for `path`.
pub trait ParseResultExt<T> {
    fn with_parse_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T, E: Display> ParseResultExt<T> for Result<T, E> {
    fn with_parse_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
