//! Biolink category ancestry for the disease categories the reasoner pins.

/// Ancestor chains, most specific first, mixins after the `is_a` chain and
/// `NamedThing` last.
const ANCESTRY: &[(&str, &[&str])] = &[(
    "biolink:Disease",
    &[
        "biolink:Disease",
        "biolink:DiseaseOrPhenotypicFeature",
        "biolink:BiologicalEntity",
        "biolink:ThingWithTaxon",
        "biolink:NamedThing",
    ],
)];

#[derive(Debug, Clone, Copy, Default)]
pub struct BiolinkHelper;

impl BiolinkHelper {
    pub fn new() -> Self {
        Self
    }

    /// The category itself plus its ancestors. Unknown categories only yield themselves.
    pub fn get_ancestors(&self, category: &str) -> Vec<String> {
        ANCESTRY
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, ancestors)| ancestors.iter().map(|a| a.to_string()).collect())
            .unwrap_or_else(|| vec![category.to_string()])
    }
}
