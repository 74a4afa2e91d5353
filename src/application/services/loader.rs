//! File loading for trees, themes and chart options
//!
//! The format is chosen by extension: `.json` or `.toml`.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::error_ext::{IoResultExt, ParseResultExt};
use crate::application::options::{ChartOptions, Theme};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::TreeNode;
use crate::infrastructure::traits::FileSystem;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Reads chart inputs through the filesystem boundary.
pub struct DataLoader {
    fs: Arc<dyn FileSystem>,
}

impl DataLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load a hierarchy (`{name, size?, children?, ...}`).
    pub fn load_tree(&self, path: &Path) -> ApplicationResult<TreeNode> {
        self.load(path, "read tree")
    }

    /// Load a theme object keyed by chart role.
    pub fn load_theme(&self, path: &Path) -> ApplicationResult<Theme> {
        self.load(path, "read theme")
    }

    /// Load a full options document (camelCase keys).
    pub fn load_options(&self, path: &Path) -> ApplicationResult<ChartOptions> {
        self.load(path, "read options")
    }

    fn load<T: DeserializeOwned>(&self, path: &Path, action: &str) -> ApplicationResult<T> {
        let format = Format::from_path(path)?;
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("{}: {}", action, path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context(action, path)?;
        debug!("{}: {} ({:?}, {} bytes)", action, path.display(), format, content.len());

        match format {
            Format::Json => serde_json::from_str(&content).with_parse_context(path),
            Format::Toml => toml::from_str(&content).with_parse_context(path),
        }
    }
}
