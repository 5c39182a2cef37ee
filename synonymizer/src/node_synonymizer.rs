use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Canonical identity of a concept as reported by the synonymizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalInfo {
    pub preferred_curie: String,
    pub preferred_name: String,
    pub preferred_category: String,
    /// Every category seen across the equivalent identifiers.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Batched name/CURIE canonicalization backend.
///
/// Lookups return one entry per requested key; `None` marks a key the backend
/// could not resolve.
pub trait NodeSynonymizer: Send + Sync {
    fn canonical_curies_by_name(
        &self,
        names: &[String],
    ) -> anyhow::Result<HashMap<String, Option<CanonicalInfo>>>;

    fn canonical_curies_by_curie(
        &self,
        curies: &[String],
    ) -> anyhow::Result<HashMap<String, Option<CanonicalInfo>>>;

    /// Categories attached to `curie` by the node normalizer.
    fn normalizer_categories(&self, curie: &str) -> anyhow::Result<Vec<String>>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynonymEntry {
    pub curie: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub equivalent_curies: Vec<String>,
}

impl SynonymEntry {
    pub fn new(
        curie: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            curie: curie.into(),
            name: name.into(),
            category: category.into(),
            categories: Vec::new(),
            synonyms: Vec::new(),
            equivalent_curies: Vec::new(),
        }
    }

    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.push(synonym.into());
        self
    }

    pub fn with_equivalent(mut self, curie: impl Into<String>) -> Self {
        self.equivalent_curies.push(curie.into());
        self
    }

    fn info(&self) -> CanonicalInfo {
        let mut categories = vec![self.category.clone()];
        for category in &self.categories {
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }
        CanonicalInfo {
            preferred_curie: self.curie.clone(),
            preferred_name: self.name.clone(),
            preferred_category: self.category.clone(),
            categories,
        }
    }
}

/// Synonymizer backed by an in-memory table, optionally loaded from a JSON dump.
///
/// Name matching is case-insensitive; CURIE matching is exact.
#[derive(Debug, Default)]
pub struct InMemorySynonymizer {
    entries: Vec<SynonymEntry>,
    by_name: HashMap<String, usize>,
    by_curie: HashMap<String, usize>,
}

impl InMemorySynonymizer {
    pub fn new(entries: Vec<SynonymEntry>) -> Self {
        let mut synonymizer = Self::default();
        for entry in entries {
            synonymizer.insert(entry);
        }
        synonymizer
    }

    /// Loads a JSON array of [`SynonymEntry`] records.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let entries: Vec<SynonymEntry> = serde_json::from_str(&raw)?;
        tracing::info!(
            "Loaded {} synonym entries from {}",
            entries.len(),
            path.as_ref().display()
        );
        Ok(Self::new(entries))
    }

    pub fn insert(&mut self, entry: SynonymEntry) {
        let idx = self.entries.len();
        // Earlier entries keep a contested name or CURIE.
        for name in std::iter::once(&entry.name).chain(entry.synonyms.iter()) {
            self.by_name.entry(name.to_lowercase()).or_insert(idx);
        }
        for curie in std::iter::once(&entry.curie).chain(entry.equivalent_curies.iter()) {
            self.by_curie.entry(curie.clone()).or_insert(idx);
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NodeSynonymizer for InMemorySynonymizer {
    fn canonical_curies_by_name(
        &self,
        names: &[String],
    ) -> anyhow::Result<HashMap<String, Option<CanonicalInfo>>> {
        Ok(names
            .iter()
            .map(|name| {
                let info = self
                    .by_name
                    .get(&name.to_lowercase())
                    .map(|idx| self.entries[*idx].info());
                (name.clone(), info)
            })
            .collect())
    }

    fn canonical_curies_by_curie(
        &self,
        curies: &[String],
    ) -> anyhow::Result<HashMap<String, Option<CanonicalInfo>>> {
        Ok(curies
            .iter()
            .map(|curie| {
                let info = self
                    .by_curie
                    .get(curie)
                    .map(|idx| self.entries[*idx].info());
                (curie.clone(), info)
            })
            .collect())
    }

    fn normalizer_categories(&self, curie: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .by_curie
            .get(curie)
            .map(|idx| self.entries[*idx].info().categories)
            .unwrap_or_default())
    }
}
