use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogError};

/// Result of a catalog load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    NotFound { path: PathBuf },
    Failed { message: String },
}

impl LoadOutcome {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { count } => write!(f, "Loaded {count} APIs"),
            Self::NotFound { path } => write!(f, "Data file not found: {}", path.display()),
            Self::Failed { message } => write!(f, "Error loading data: {message}"),
        }
    }
}

/// Shared handle to the process-wide catalog.
///
/// Readers take an `Arc` snapshot and never hold the lock while scanning.
/// Loads swap the snapshot in one step.
#[derive(Clone, Default)]
pub struct CatalogHandle {
    inner: Arc<RwLock<Option<Arc<Catalog>>>>,
}

impl CatalogHandle {
    /// Creates a handle with no catalog loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle that already holds `catalog`.
    #[must_use]
    pub fn from_catalog(catalog: Catalog) -> Self {
        let handle = Self::new();
        handle.replace(catalog);
        handle
    }

    /// Loads the catalog at `path`, replacing the current one on success.
    ///
    /// A failed load leaves whatever was loaded before in place.
    pub fn load(&self, path: impl AsRef<Path>) -> LoadOutcome {
        let path = path.as_ref();
        let outcome = match Catalog::load(path) {
            Ok(catalog) => {
                let count = catalog.len();
                self.replace(catalog);
                LoadOutcome::Loaded { count }
            }
            Err(CatalogError::NotFound(path)) => LoadOutcome::NotFound { path },
            Err(err) => LoadOutcome::Failed {
                message: err.to_string(),
            },
        };

        if outcome.is_loaded() {
            info!(path = %path.display(), "{outcome}");
        } else {
            warn!(path = %path.display(), "{outcome}");
        }
        outcome
    }

    pub fn replace(&self, catalog: Catalog) {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(catalog));
    }

    /// Returns the current catalog, or `None` if nothing has been loaded.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Catalog>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }
}
