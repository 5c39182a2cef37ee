use crate::node_synonymizer::{CanonicalInfo, NodeSynonymizer};
use arax_core::error::{AraxError, ErrorCode};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynonymizerError {
    #[error("Synonymizer backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl AraxError for SynonymizerError {
    fn error_code(&self) -> ErrorCode {
        match self {
            SynonymizerError::Backend(_) => ErrorCode::Unavailable,
        }
    }
}

/// A name or CURIE successfully mapped to its canonical identity.
pub type ResolvedEntity = CanonicalInfo;

/// Resolution results. Keys the synonymizer could not resolve are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEntities {
    entries: HashMap<String, ResolvedEntity>,
}

impl ResolvedEntities {
    pub fn get(&self, key: &str) -> Option<&ResolvedEntity> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn curie(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(|entity| entity.preferred_curie.as_str())
    }

    /// Pins `key` to a known identity, replacing any resolved value.
    pub fn insert(&mut self, key: impl Into<String>, entity: ResolvedEntity) {
        self.entries.insert(key.into(), entity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ResolvedEntity)> for ResolvedEntities {
    fn from_iter<T: IntoIterator<Item = (String, ResolvedEntity)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Batches canonicalization requests against a [`NodeSynonymizer`].
#[derive(Clone)]
pub struct EntityResolver {
    synonymizer: Arc<dyn NodeSynonymizer>,
}

impl EntityResolver {
    pub fn new(synonymizer: Arc<dyn NodeSynonymizer>) -> Self {
        Self { synonymizer }
    }

    /// Resolves every name in one backend call.
    pub fn resolve_names(&self, names: &BTreeSet<String>) -> Result<ResolvedEntities, SynonymizerError> {
        let keys: Vec<String> = names.iter().cloned().collect();
        let raw = self.synonymizer.canonical_curies_by_name(&keys)?;
        Ok(collect_resolved("name", keys.len(), raw))
    }

    /// Resolves every CURIE in one backend call.
    pub fn resolve_curies(&self, curies: &BTreeSet<String>) -> Result<ResolvedEntities, SynonymizerError> {
        let keys: Vec<String> = curies.iter().cloned().collect();
        let raw = self.synonymizer.canonical_curies_by_curie(&keys)?;
        Ok(collect_resolved("curie", keys.len(), raw))
    }

    pub fn normalizer_categories(&self, curie: &str) -> Result<Vec<String>, SynonymizerError> {
        Ok(self.synonymizer.normalizer_categories(curie)?)
    }
}

fn collect_resolved(
    kind: &str,
    requested: usize,
    raw: HashMap<String, Option<CanonicalInfo>>,
) -> ResolvedEntities {
    let resolved: ResolvedEntities = raw
        .into_iter()
        .filter_map(|(key, info)| info.map(|info| (key, info)))
        .collect();
    tracing::debug!(
        "Resolved {} of {} requested {} keys",
        resolved.len(),
        requested,
        kind
    );
    resolved
}
