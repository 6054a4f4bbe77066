//! Registry for the available citation finders.

use std::collections::HashMap;
use std::sync::Arc;

use super::{natbib::NatbibFinder, plaintext::PlainTextFinder, CitationFinder, FinderError};

bitflags::bitflags! {
    /// Operations a finder implements
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FinderCapabilities: u32 {
        const FIND_CITATIONS = 1 << 0;
        const FIND_REFLIST = 1 << 1;
        const FIND_STYLE = 1 << 2;
        const REVERT_CITATIONS = 1 << 3;
        const REVERT_REFLIST = 1 << 4;
        const REVERT_STYLE = 1 << 5;
    }
}

/// Registry of citation finders, keyed by notation id
#[derive(Debug, Clone)]
pub struct FinderRegistry {
    finders: HashMap<String, Arc<dyn CitationFinder>>,
}

impl FinderRegistry {
    /// Create a registry holding every built-in finder
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Arc::new(NatbibFinder::new()));
        registry.register(Arc::new(PlainTextFinder::new()));

        registry
    }

    /// Create a registry with no finder
    pub fn empty() -> Self {
        Self {
            finders: HashMap::new(),
        }
    }

    /// Register a finder, replacing any finder with the same id
    pub fn register(&mut self, finder: Arc<dyn CitationFinder>) {
        self.finders.insert(finder.id().to_string(), finder);
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn CitationFinder>> {
        self.finders.get(id)
    }

    /// Get a finder by id, returning an error if not found
    pub fn get_required(&self, id: &str) -> Result<&Arc<dyn CitationFinder>, FinderError> {
        self.get(id)
            .ok_or_else(|| FinderError::NotFound(format!("Finder '{}' not found", id)))
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn CitationFinder>> {
        self.finders.values()
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.finders.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Finders that implement every operation in `capability`
    pub fn with_capability(&self, capability: FinderCapabilities) -> Vec<&Arc<dyn CitationFinder>> {
        self.all()
            .filter(|f| f.capabilities().contains(capability))
            .collect()
    }

    pub fn has(&self, id: &str) -> bool {
        self.finders.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }
}

impl Default for FinderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
