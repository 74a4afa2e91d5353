//! Service container for dependency injection
//!
//! Wires settings, filesystem and services together for the CLI.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::options::ChartOptions;
use crate::application::services::{DataLoader, SunburstService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding all application services.
pub struct ServiceContainer {
    pub settings: Arc<Settings>,
    pub fs: Arc<dyn FileSystem>,
    pub loader: DataLoader,
    pub sunburst: SunburstService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with a custom filesystem (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            loader: DataLoader::new(Arc::clone(&fs)),
            sunburst: SunburstService::new(),
            fs,
        }
    }

    /// Options from settings: chart defaults plus the configured theme file.
    pub fn base_options(&self) -> InfraResult<ChartOptions> {
        let mut options = self.settings.chart.to_options();
        if let Some(theme_file) = &self.settings.theme_file {
            debug!("theme from settings: {}", theme_file.display());
            options.theme = Some(self.loader.load_theme(theme_file)?);
        }
        Ok(options)
    }

    /// Write rendered output, mapping failures to [`InfraError::Io`].
    pub fn write_output(&self, path: &Path, content: &str) -> InfraResult<()> {
        self.fs
            .write(path, content)
            .map_err(|e| InfraError::io(format!("write {}", path.display()), e))
    }
}
