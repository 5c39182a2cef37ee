//! Creative-mode drug-treats-disease subgraph synthesis.
//!
//! Turns the ranked drugs and explanatory paths of the prediction model into
//! TRAPI query/knowledge graphs plus scored, ranked results:
//!
//! 1. validate the query graph and lay down the drug/disease skeleton
//! 2. canonicalize every node name in one synonymizer call
//! 3. build one optional query chain per path length
//! 4. project each pair's first resolvable paths and add its prediction edge
//! 5. decorate, resultify, score and sort
//!
//! With no usable paths at all, drugs are attached straight to the disease.

use crate::allocator::IdAllocator;
use crate::decorator::{Decorator, NoOpDecorator};
use crate::expansion::{collect_node_names, hop_counts, PathExpansionEngine, PathTemplate};
use crate::fallback::ZeroPathFallback;
use crate::graph_builder::{DiseaseSeed, GraphBuilder, GraphError};
use crate::input::{DrugPrediction, PairPaths};
use crate::resultify::{Resultifier, SubgraphResultifier};
use crate::scoring::finalize;
use arax_core::config::AraxConfig;
use arax_core::error::{AraxError, ErrorCode};
use arax_core::response::Response;
use std::collections::BTreeMap;
use std::sync::Arc;
use synonymizer::{EntityResolver, NodeSynonymizer, ResolvedEntity};
use thiserror::Error;

const PINNED_DISEASE_CATEGORY: &str = "biolink:DiseaseOrPhenotypicFeature";

#[derive(Error, Debug)]
pub enum CreativeError {
    #[error("configuration conflict: {0}")]
    ConfigurationConflict(String),
    #[error("drug table is empty")]
    EmptyDrugTable,
}

impl AraxError for CreativeError {
    fn error_code(&self) -> ErrorCode {
        match self {
            CreativeError::ConfigurationConflict(_) => ErrorCode::FailedPrecondition,
            CreativeError::EmptyDrugTable => ErrorCode::InvalidArgument,
        }
    }
}

/// What one run produced besides the mutations on the response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreativeOutcome {
    /// Treat score per essence name.
    pub essence_scores: BTreeMap<String, f64>,
    /// Warnings recorded on the response during this run.
    pub warnings: Vec<String>,
    /// Query chains built this run, by hop count.
    pub templates: BTreeMap<usize, PathTemplate>,
    /// False when a collaborator put the response into an error state.
    pub completed: bool,
}

pub struct CreativeDtd {
    config: AraxConfig,
    builder: GraphBuilder,
    resolver: EntityResolver,
    decorator: Box<dyn Decorator>,
    resultifier: Box<dyn Resultifier>,
    ids: IdAllocator,
}

impl CreativeDtd {
    pub fn new(synonymizer: Arc<dyn NodeSynonymizer>) -> Self {
        let config = AraxConfig::default();
        Self {
            builder: GraphBuilder::new(config.knowledge.clone(), config.creative.clone()),
            config,
            resolver: EntityResolver::new(synonymizer),
            decorator: Box::new(NoOpDecorator),
            resultifier: Box::new(SubgraphResultifier::new()),
            ids: IdAllocator::new(),
        }
    }

    pub fn with_config(mut self, config: AraxConfig) -> Self {
        self.builder = GraphBuilder::new(config.knowledge.clone(), config.creative.clone());
        self.config = config;
        self
    }

    pub fn with_decorator(mut self, decorator: Box<dyn Decorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn with_resultifier(mut self, resultifier: Box<dyn Resultifier>) -> Self {
        self.resultifier = resultifier;
        self
    }

    /// Resume identifier allocation from an earlier run on the same response.
    pub fn with_allocator(mut self, ids: IdAllocator) -> Self {
        self.ids = ids;
        self
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.ids
    }

    /// Materializes the model's predictions into `response`.
    ///
    /// `target_qedge` must name an edge of a non-empty query graph, or be `None`
    /// for an empty one; anything else is a [`CreativeError::ConfigurationConflict`].
    /// Collaborator failures leave `response` in an error state and return an
    /// outcome with `completed == false`.
    pub fn generate_treat_subgraphs(
        &mut self,
        response: &mut Response,
        top_drugs: &[DrugPrediction],
        top_paths: &[PairPaths],
        target_qedge: Option<&str>,
    ) -> Result<CreativeOutcome, CreativeError> {
        let warnings_before = response.warnings().len();
        let mut outcome = self.run(response, top_drugs, top_paths, target_qedge)?;
        outcome.warnings = response
            .warnings()
            .into_iter()
            .skip(warnings_before)
            .map(str::to_string)
            .collect();
        Ok(outcome)
    }

    fn run(
        &mut self,
        response: &mut Response,
        top_drugs: &[DrugPrediction],
        top_paths: &[PairPaths],
        target_qedge: Option<&str>,
    ) -> Result<CreativeOutcome, CreativeError> {
        let mut outcome = CreativeOutcome::default();
        let Some(first) = top_drugs.first() else {
            let err = CreativeError::EmptyDrugTable;
            response.error(err.to_string(), err.error_code());
            return Err(err);
        };
        let disease = DiseaseSeed {
            curie: first.disease_id.clone(),
            name: first.disease_name.clone(),
        };

        let slots = match self
            .builder
            .ensure_graph_initialized(response, target_qedge, &disease, &self.resolver)
        {
            Ok(slots) => slots,
            Err(GraphError::ConfigurationConflict(reason)) => {
                return Err(CreativeError::ConfigurationConflict(reason));
            }
            Err(_) => return Ok(outcome),
        };

        let delimiter = self.config.creative.path_delimiter.clone();
        let hops = hop_counts(top_paths, &delimiter);

        let essence_scores = if hops.is_empty() {
            response.info("No explanatory paths found; attaching drugs directly to the disease");
            let fallback = ZeroPathFallback::new(&self.builder);
            match fallback.apply(response, &slots, top_drugs, &self.resolver) {
                Ok(Some(scores)) => scores,
                Ok(None) => return Ok(outcome),
                Err(err) => {
                    response.error(err.to_string(), err.error_code());
                    return Ok(outcome);
                }
            }
        } else {
            let names = collect_node_names(top_paths, &delimiter);
            let mut resolved = match self.resolver.resolve_names(&names) {
                Ok(resolved) => resolved,
                Err(err) => {
                    response.error(
                        format!("Failed to resolve path node names: {}", err),
                        err.error_code(),
                    );
                    return Ok(outcome);
                }
            };
            let category = resolved
                .get(&disease.name)
                .map(|entity| entity.preferred_category.clone())
                .unwrap_or_else(|| PINNED_DISEASE_CATEGORY.to_string());
            resolved.insert(
                disease.name.clone(),
                ResolvedEntity {
                    preferred_curie: disease.curie.clone(),
                    preferred_name: disease.name.clone(),
                    preferred_category: category.clone(),
                    categories: vec![category],
                },
            );

            let engine = PathExpansionEngine::new(&self.builder, &self.config.creative);
            let Some(templates) = engine.build_templates(response, &slots, &hops, &mut self.ids)
            else {
                return Ok(outcome);
            };
            outcome.templates = templates;

            match engine.project_pairs(
                response,
                &slots,
                &outcome.templates,
                top_drugs,
                top_paths,
                &resolved,
                &mut self.ids,
            ) {
                Ok(scores) => scores,
                Err(err) => {
                    response.error(err.to_string(), err.error_code());
                    return Ok(outcome);
                }
            }
        };
        outcome.essence_scores = essence_scores;

        self.decorator.decorate_nodes(response);
        if !response.is_ok() {
            return Ok(outcome);
        }
        self.decorator.decorate_edges(response);
        if !response.is_ok() {
            return Ok(outcome);
        }

        finalize(response, self.resultifier.as_ref(), &outcome.essence_scores);
        outcome.completed = response.is_ok();
        tracing::info!(
            "Creative DTD produced {} results for {}",
            response.message().results.len(),
            disease.curie
        );
        Ok(outcome)
    }
}
