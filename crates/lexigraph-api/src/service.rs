//! The facade exposed to the routing layer.
//!
//! `VocabService` owns an injectable [`CacheManager`] and obtains a current
//! store for every operation via `load(false)` — the staleness window
//! decides when that triggers a rebuild. Nothing here forces a reload on the
//! query path.

use crate::config::ServiceConfig;
use crate::error::VocabError;
use crate::indexer::{self, VocabularyProperties};
use crate::record::{ConceptRecord, SchemeRecord};
use crate::resolver;
use crate::search::{self, SearchOutcome};
use lexigraph_cache::CacheManager;
use lexigraph_store::{EntityKind, TripleStore};

pub struct VocabService {
    cache: CacheManager,
}

impl VocabService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            cache: CacheManager::new(config.cache_config()),
        }
    }

    /// Construct around an existing cache manager (tests inject one).
    pub fn with_cache(cache: CacheManager) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    fn store(&self) -> Result<TripleStore, VocabError> {
        Ok(self.cache.load(false)?)
    }

    /// Ranked search over concepts or concept schemes.
    pub fn search(&self, input: &str, kind: EntityKind) -> Result<SearchOutcome, VocabError> {
        let store = self.store()?;
        search::search(&store, input, kind)
    }

    /// Resolve a concept URI. `Ok(None)` when the URI occurs nowhere in the
    /// graph.
    pub fn concept(&self, uri: &str) -> Result<Option<ConceptRecord>, VocabError> {
        let store = self.store()?;
        if !store.mentions(uri) {
            return Ok(None);
        }
        Ok(Some(resolver::resolve_concept(&store, uri)))
    }

    /// Resolve a concept scheme URI.
    pub fn scheme(&self, uri: &str) -> Result<Option<SchemeRecord>, VocabError> {
        let store = self.store()?;
        if !store.mentions(uri) {
            return Ok(None);
        }
        Ok(Some(resolver::resolve_scheme(&store, uri)))
    }

    /// Resolve a concept scheme URI including its member concepts.
    pub fn scheme_concepts(&self, uri: &str) -> Result<Option<SchemeRecord>, VocabError> {
        let store = self.store()?;
        if !store.mentions(uri) {
            return Ok(None);
        }
        Ok(Some(resolver::resolve_scheme_with_members(&store, uri)))
    }

    pub fn index_strict(
        &self,
        namespace: &str,
        recognized_terms: &[String],
        properties: &[(String, String)],
    ) -> Result<VocabularyProperties, VocabError> {
        let store = self.store()?;
        indexer::index_strict(&store, namespace, recognized_terms, properties)
    }

    pub fn index_lenient(
        &self,
        namespace: &str,
        recognized_terms: &[String],
        properties: &[(String, String)],
    ) -> Result<VocabularyProperties, VocabError> {
        let store = self.store()?;
        indexer::index_lenient(&store, namespace, recognized_terms, properties)
    }
}
