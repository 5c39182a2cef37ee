//! Path Expansion Engine.
//!
//! Paths of different lengths are alternatives to each other, so every hop
//! count gets its own optional chain in the query graph. All paths with the
//! same hop count share that chain.

use crate::allocator::IdAllocator;
use crate::graph_builder::{GraphBuilder, GraphError, GraphSlots};
use crate::input::{treat_score, DrugPrediction, PairPaths};
use crate::path::{ExplanatoryPath, Hop};
use arax_core::config::CreativeConfig;
use arax_core::messenger::{AddQEdgeParams, AddQNodeParams};
use arax_core::model::{Edge, NAMED_THING};
use arax_core::response::Response;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use synonymizer::ResolvedEntities;

/// Query-graph chain shared by every path of one hop count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathTemplate {
    pub hop_count: usize,
    pub option_group_id: String,
    /// Drug slot, intermediate slots, disease slot.
    pub qnode_keys: Vec<String>,
    /// `qedge_keys[i]` joins `qnode_keys[i]` and `qnode_keys[i + 1]`.
    pub qedge_keys: Vec<String>,
}

impl PathTemplate {
    pub fn intermediate_qnode_keys(&self) -> &[String] {
        &self.qnode_keys[1..self.qnode_keys.len() - 1]
    }
}

/// Every node name (drug, intermediates, disease) mentioned in any path.
pub fn collect_node_names(top_paths: &[PairPaths], delimiter: &str) -> BTreeSet<String> {
    top_paths
        .iter()
        .flat_map(|pair| pair.paths.iter())
        .flat_map(|scored| {
            ExplanatoryPath::parse(&scored.path, delimiter)
                .node_names()
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Distinct non-zero hop counts of the well-formed paths.
pub fn hop_counts(top_paths: &[PairPaths], delimiter: &str) -> BTreeSet<usize> {
    top_paths
        .iter()
        .flat_map(|pair| pair.paths.iter())
        .filter_map(|scored| ExplanatoryPath::parse(&scored.path, delimiter).hop_count())
        .filter(|hops| *hops > 0)
        .collect()
}

pub struct PathExpansionEngine<'a> {
    builder: &'a GraphBuilder,
    config: &'a CreativeConfig,
}

impl<'a> PathExpansionEngine<'a> {
    pub fn new(builder: &'a GraphBuilder, config: &'a CreativeConfig) -> Self {
        Self { builder, config }
    }

    /// Adds one optional chain per hop count, shortest first.
    ///
    /// Returns `None` once the messenger has put `response` into an error state.
    pub fn build_templates(
        &self,
        response: &mut Response,
        slots: &GraphSlots,
        hop_counts: &BTreeSet<usize>,
        ids: &mut IdAllocator,
    ) -> Option<BTreeMap<usize, PathTemplate>> {
        let messenger = self.builder.messenger();
        let mut templates = BTreeMap::new();

        for &hop_count in hop_counts {
            let option_group_id = ids.next_option_group_id();
            let mut qnode_keys = vec![slots.drug_qnode_key.clone()];
            for _ in 1..hop_count {
                let key = ids.next_qnode_key();
                let mut params = AddQNodeParams::new(key.clone());
                params.option_group_id = Some(option_group_id.clone());
                params.is_set = true;
                messenger.add_qnode(response, params);
                if !response.is_ok() {
                    return None;
                }
                qnode_keys.push(key);
            }
            qnode_keys.push(slots.disease_qnode_key.clone());

            let mut qedge_keys = Vec::with_capacity(hop_count);
            for pair in qnode_keys.windows(2) {
                let key = ids.next_qedge_key();
                let mut params = AddQEdgeParams::new(key.clone(), pair[0].clone(), pair[1].clone());
                params.option_group_id = Some(option_group_id.clone());
                messenger.add_qedge(response, params);
                if !response.is_ok() {
                    return None;
                }
                if let Some(qedge) = response.message_mut().query_graph.edges.get_mut(&key) {
                    qedge.filled = true;
                }
                qedge_keys.push(key);
            }

            tracing::debug!(
                "Built {}-hop template in option group {}",
                hop_count,
                option_group_id
            );
            templates.insert(
                hop_count,
                PathTemplate {
                    hop_count,
                    option_group_id,
                    qnode_keys,
                    qedge_keys,
                },
            );
        }

        Some(templates)
    }

    /// Projects each pair's resolvable paths and adds its prediction edge.
    ///
    /// Returns the essence scores keyed by the drug name as written in the path.
    pub fn project_pairs(
        &self,
        response: &mut Response,
        slots: &GraphSlots,
        templates: &BTreeMap<usize, PathTemplate>,
        top_drugs: &[DrugPrediction],
        top_paths: &[PairPaths],
        resolved: &ResolvedEntities,
        ids: &mut IdAllocator,
    ) -> Result<BTreeMap<String, f64>, GraphError> {
        let predicate = self.builder.treat_predicate(response, slots);
        let mut essence_scores = BTreeMap::new();

        for pair in top_paths {
            let Some(score) = treat_score(top_drugs, &pair.drug_id) else {
                response.warning(format!(
                    "Drug {} has paths but no treat score in the drug table. Skipping this result....",
                    pair.drug_id
                ));
                continue;
            };

            let mut drug_name: Option<String> = None;
            let mut projected = 0;
            for scored in &pair.paths {
                if projected >= self.config.max_variants_per_pair {
                    break;
                }
                let path = ExplanatoryPath::parse(&scored.path, &self.config.path_delimiter);
                let Some(template) = path.hop_count().and_then(|hops| templates.get(&hops)) else {
                    continue;
                };
                if path.node_names().any(|name| !resolved.contains(name)) {
                    continue;
                }

                self.project_path(response, &path, template, resolved)?;
                if drug_name.is_none() {
                    drug_name = path.first_node().map(str::to_string);
                }
                projected += 1;
            }

            let Some(drug_name) = drug_name else {
                response.warning(format!(
                    "Something went wrong when adding the subgraph for the drug-disease pair ({},{}) to the knowledge graph. Skipping this result....",
                    pair.drug_id, pair.disease_id
                ));
                continue;
            };
            let Some(drug_curie) = resolved.curie(&drug_name) else {
                continue;
            };

            let edge = Edge {
                subject: drug_curie.to_string(),
                object: slots.disease_curie.clone(),
                predicate: predicate.clone(),
                attributes: self.builder.prediction_attributes(score),
                qedge_keys: vec![slots.target_qedge_key.clone()],
            };
            let key = ids.next_prediction_edge_key();
            self.builder
                .insert_edge(&mut response.message_mut().knowledge_graph, key, edge)?;
            // Keep the first pair's score for a drug name seen twice.
            essence_scores.entry(drug_name).or_insert(score);
        }

        Ok(essence_scores)
    }

    fn project_path(
        &self,
        response: &mut Response,
        path: &ExplanatoryPath,
        template: &PathTemplate,
        resolved: &ResolvedEntities,
    ) -> Result<(), GraphError> {
        for (i, hop) in path.hops().into_iter().enumerate() {
            let Hop {
                subject,
                predicate,
                object,
            } = hop;
            let subject_curie = self.upsert_named(response, subject, &template.qnode_keys[i], resolved);
            let object_curie = self.upsert_named(response, object, &template.qnode_keys[i + 1], resolved);

            let predicate = if predicate == self.config.self_loop_sentinel {
                response.warning(format!(
                    "Self-loop relation detected: {} {} {}, replacing with placeholder '{}'",
                    subject, predicate, object, self.config.self_loop_placeholder
                ));
                self.config.self_loop_placeholder.as_str()
            } else {
                predicate
            };

            self.builder.upsert_edge(
                &mut response.message_mut().knowledge_graph,
                &subject_curie,
                predicate,
                &object_curie,
                &template.qedge_keys[i],
                Vec::new(),
            )?;
        }
        Ok(())
    }

    fn upsert_named(
        &self,
        response: &mut Response,
        name: &str,
        qnode_key: &str,
        resolved: &ResolvedEntities,
    ) -> String {
        let (curie, categories) = match resolved.get(name) {
            Some(entity) => (
                entity.preferred_curie.clone(),
                vec![entity.preferred_category.clone()],
            ),
            None => (name.to_string(), vec![NAMED_THING.to_string()]),
        };
        self.builder.upsert_node(
            &mut response.message_mut().knowledge_graph,
            &curie,
            name,
            &categories,
            qnode_key,
        );
        curie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScoredPath;

    fn pairs(paths: &[&str]) -> Vec<PairPaths> {
        vec![PairPaths::new(
            "D1",
            "MONDO:1",
            paths.iter().map(|p| ScoredPath::new(*p, 0.5)).collect(),
        )]
    }

    #[test]
    fn test_hop_counts_skip_empty_and_malformed() {
        let input = pairs(&["", "A->p->B", "A->p", "A->p->B->q->C"]);
        assert_eq!(hop_counts(&input, "->"), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_collect_node_names_ignores_predicates() {
        let input = pairs(&["A->p->B", "A->q->C->r->B", ""]);
        let names = collect_node_names(&input, "->");
        assert_eq!(
            names,
            BTreeSet::from(["A".to_string(), "B".to_string(), "C".to_string()])
        );
    }
}
