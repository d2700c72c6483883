//! Service container for dependency injection
//!
//! Wires up the pipeline with its dependencies.

use std::sync::Arc;

use crate::application::DocumentPipeline;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding application services and their shared dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Document pipeline bound to this container's filesystem.
    pub fn pipeline(&self) -> DocumentPipeline {
        DocumentPipeline::new(Arc::clone(&self.fs))
    }
}
