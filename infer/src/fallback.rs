//! Zero-path fallback: drugs are attached straight to the disease.

use crate::graph_builder::{GraphBuilder, GraphError, GraphSlots};
use crate::input::DrugPrediction;
use arax_core::error::AraxError;
use arax_core::response::Response;
use std::collections::{BTreeMap, BTreeSet};
use synonymizer::EntityResolver;

pub struct ZeroPathFallback<'a> {
    builder: &'a GraphBuilder,
}

impl<'a> ZeroPathFallback<'a> {
    pub fn new(builder: &'a GraphBuilder) -> Self {
        Self { builder }
    }

    /// One direct prediction edge per resolvable drug, deduplicated by
    /// canonical CURIE.
    ///
    /// Returns `Ok(None)` when the synonymizer failed; the failure is recorded on
    /// `response`. Essence scores are keyed by the drug's preferred name.
    pub fn apply(
        &self,
        response: &mut Response,
        slots: &GraphSlots,
        top_drugs: &[DrugPrediction],
        resolver: &EntityResolver,
    ) -> Result<Option<BTreeMap<String, f64>>, GraphError> {
        let drug_ids: BTreeSet<String> = top_drugs.iter().map(|row| row.drug_id.clone()).collect();
        let resolved = match resolver.resolve_curies(&drug_ids) {
            Ok(resolved) => resolved,
            Err(err) => {
                response.error(
                    format!("Failed to resolve drug identifiers: {}", err),
                    err.error_code(),
                );
                return Ok(None);
            }
        };

        let predicate = self.builder.treat_predicate(response, slots);
        let mut seen = BTreeSet::new();
        let mut essence_scores = BTreeMap::new();

        for row in top_drugs {
            let Some(drug) = resolved.get(&row.drug_id) else {
                if seen.insert(row.drug_id.as_str()) {
                    response.warning(format!(
                        "Could not resolve drug {} ({}). Skipping this result....",
                        row.drug_id, row.drug_name
                    ));
                }
                continue;
            };
            // Equivalent identifiers share one edge; its first row sets the score.
            if !seen.insert(drug.preferred_curie.as_str()) {
                continue;
            }

            let knowledge_graph = &mut response.message_mut().knowledge_graph;
            self.builder.upsert_node(
                knowledge_graph,
                &drug.preferred_curie,
                &drug.preferred_name,
                &[drug.preferred_category.clone()],
                &slots.drug_qnode_key,
            );
            self.builder.upsert_edge(
                knowledge_graph,
                &drug.preferred_curie,
                &predicate,
                &slots.disease_curie,
                &slots.target_qedge_key,
                self.builder.prediction_attributes(row.tp_score),
            )?;
            essence_scores
                .entry(drug.preferred_name.clone())
                .or_insert(row.tp_score);
        }

        tracing::info!(
            "Attached {} drugs directly to {}",
            essence_scores.len(),
            slots.disease_curie
        );
        Ok(Some(essence_scores))
    }
}
