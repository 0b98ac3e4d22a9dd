use kis_store::models::SearchEnvelope;
use tracing::debug;

use crate::services::CatalogHandle;

pub mod query;
pub mod search;

pub use query::{Predicate, Predicates, SearchQuery};
pub use search::{MSG_DATA_NOT_LOADED, MSG_NO_VALID_PARAMETERS, search_catalog};

/// Query engine bound to a shared catalog handle.
#[derive(Clone)]
pub struct ApiSearcher {
    catalog: CatalogHandle,
}

impl ApiSearcher {
    #[must_use]
    pub const fn new(catalog: CatalogHandle) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    /// Searches the current catalog snapshot.
    ///
    /// Never fails: an unloaded catalog or an empty query is reported through
    /// the envelope status.
    #[must_use]
    pub fn search(&self, query: &SearchQuery) -> SearchEnvelope {
        let Some(catalog) = self.catalog.snapshot() else {
            return SearchEnvelope::error(MSG_DATA_NOT_LOADED);
        };
        let envelope = search_catalog(&catalog, query);
        debug!(
            status = ?envelope.status,
            total_count = envelope.total_count,
            returned = envelope.results.len(),
            "catalog search"
        );
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kis_store::models::{ApiRecord, SearchStatus};

    use crate::catalog::Catalog;

    #[test]
    fn unloaded_catalog_short_circuits() {
        let searcher = ApiSearcher::new(CatalogHandle::new());
        let envelope = searcher.search(&SearchQuery::new().with("category", "auth"));

        assert_eq!(envelope.status, SearchStatus::Error);
        assert_eq!(envelope.message, MSG_DATA_NOT_LOADED);
        assert_eq!(envelope.total_count, 0);
        assert!(envelope.results.is_empty());
    }

    #[test]
    fn searcher_sees_catalog_replacements() {
        let handle = CatalogHandle::new();
        let searcher = ApiSearcher::new(handle.clone());
        handle.replace(Catalog::new(vec![ApiRecord::new("elw", "ELW시세", "volume_rank", "E1")]));

        let envelope = searcher.search(&SearchQuery::new().with("category", "elw"));

        assert_eq!(envelope.status, SearchStatus::Success);
        assert_eq!(envelope.total_count, 1);
    }
}
