use arax_core::config::{CreativeConfig, KnowledgeConfig};
use arax_core::error::{AraxError, ErrorCode};
use arax_core::messenger::{AddQEdgeParams, AddQNodeParams, Messenger};
use arax_core::model::{push_unique, Attribute, Edge, KnowledgeGraph, Node, QueryGraph, NAMED_THING};
use arax_core::response::Response;
use std::collections::btree_map::Entry;
use synonymizer::{BiolinkHelper, EntityResolver, SynonymizerError};
use thiserror::Error;

pub const FRESH_DRUG_QNODE_KEY: &str = "drug";
pub const FRESH_DISEASE_QNODE_KEY: &str = "disease";
pub const FRESH_TARGET_QEDGE_KEY: &str = "probably_treats";

const DRUG_CATEGORY: &str = "biolink:Drug";
const DISEASE_CATEGORY: &str = "biolink:Disease";
const FRESH_DISEASE_CATEGORY: &str = "biolink:DiseaseOrPhenotypicFeature";
const COMPUTED_VALUE_DESCRIPTION: &str = "This edge is a container for a computed value between two nodes that is not directly attachable to other edges.";

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("configuration conflict: {0}")]
    ConfigurationConflict(String),
    #[error("knowledge node {0} is not in the knowledge graph")]
    UnknownNode(String),
    #[error("knowledge edge key {0} is already taken")]
    DuplicateEdgeKey(String),
    #[error("query graph update failed: {0}")]
    QueryGraph(String),
    #[error("synonymizer error: {0}")]
    Synonymizer(#[from] SynonymizerError),
}

impl AraxError for GraphError {
    fn error_code(&self) -> ErrorCode {
        match self {
            GraphError::ConfigurationConflict(_) => ErrorCode::FailedPrecondition,
            GraphError::UnknownNode(_) => ErrorCode::Internal,
            GraphError::DuplicateEdgeKey(_) => ErrorCode::FailedPrecondition,
            GraphError::QueryGraph(_) => ErrorCode::InvalidArgument,
            GraphError::Synonymizer(err) => err.error_code(),
        }
    }
}

/// How the query graph is treated for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphMode {
    /// Empty query graph: build the drug/disease skeleton.
    Fresh,
    /// Existing query graph: hang everything off this edge.
    Extend { target_qedge: String },
}

impl GraphMode {
    pub fn select(query_graph: &QueryGraph, target_qedge: Option<&str>) -> Result<Self, GraphError> {
        match target_qedge {
            Some(key) if query_graph.edges.contains_key(key) => Ok(GraphMode::Extend {
                target_qedge: key.to_string(),
            }),
            Some(key) => Err(GraphError::ConfigurationConflict(format!(
                "qedge {} is not in the query graph",
                key
            ))),
            None if query_graph.edges.is_empty() => Ok(GraphMode::Fresh),
            None => Err(GraphError::ConfigurationConflict(
                "no target qedge given but the query graph is not empty".to_string(),
            )),
        }
    }
}

/// The disease every prediction in a run points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseSeed {
    pub curie: String,
    pub name: String,
}

/// Query-graph slots the rest of the run attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSlots {
    pub mode: GraphMode,
    pub drug_qnode_key: String,
    pub disease_qnode_key: String,
    pub target_qedge_key: String,
    pub disease_curie: String,
}

/// Owns the insert/merge rules for the four graph collections.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    knowledge: KnowledgeConfig,
    creative: CreativeConfig,
    messenger: Messenger,
    biolink: BiolinkHelper,
}

impl GraphBuilder {
    pub fn new(knowledge: KnowledgeConfig, creative: CreativeConfig) -> Self {
        Self {
            knowledge,
            creative,
            messenger: Messenger::new(),
            biolink: BiolinkHelper::new(),
        }
    }

    pub fn messenger(&self) -> &Messenger {
        &self.messenger
    }

    /// Validates the mode and lays down the drug/disease skeleton.
    ///
    /// A configuration conflict is returned before anything is mutated. Other
    /// failures are also recorded on `response`.
    pub fn ensure_graph_initialized(
        &self,
        response: &mut Response,
        target_qedge: Option<&str>,
        disease: &DiseaseSeed,
        resolver: &EntityResolver,
    ) -> Result<GraphSlots, GraphError> {
        let mode = match GraphMode::select(&response.message().query_graph, target_qedge) {
            Ok(mode) => mode,
            Err(err) => {
                response.error(err.to_string(), err.error_code());
                return Err(err);
            }
        };

        match mode {
            GraphMode::Fresh => self.init_fresh(response, disease),
            GraphMode::Extend { target_qedge } => {
                self.init_extend(response, target_qedge, disease, resolver)
            }
        }
    }

    fn init_fresh(&self, response: &mut Response, disease: &DiseaseSeed) -> Result<GraphSlots, GraphError> {
        let mut disease_params = AddQNodeParams::new(FRESH_DISEASE_QNODE_KEY);
        disease_params.name = Some(disease.curie.clone());
        self.messenger.add_qnode(response, disease_params);
        check_status(response)?;

        let categories = vec![FRESH_DISEASE_CATEGORY.to_string()];
        self.upsert_node(
            &mut response.message_mut().knowledge_graph,
            &disease.curie,
            &disease.name,
            &categories,
            FRESH_DISEASE_QNODE_KEY,
        );

        let mut drug_params = AddQNodeParams::new(FRESH_DRUG_QNODE_KEY);
        drug_params.categories = vec![DRUG_CATEGORY.to_string()];
        self.messenger.add_qnode(response, drug_params);
        check_status(response)?;

        let mut edge_params = AddQEdgeParams::new(
            FRESH_TARGET_QEDGE_KEY,
            FRESH_DRUG_QNODE_KEY,
            FRESH_DISEASE_QNODE_KEY,
        );
        edge_params.predicates = vec![self.creative.treat_predicate.clone()];
        self.messenger.add_qedge(response, edge_params);
        check_status(response)?;
        mark_filled(response, FRESH_TARGET_QEDGE_KEY);

        Ok(GraphSlots {
            mode: GraphMode::Fresh,
            drug_qnode_key: FRESH_DRUG_QNODE_KEY.to_string(),
            disease_qnode_key: FRESH_DISEASE_QNODE_KEY.to_string(),
            target_qedge_key: FRESH_TARGET_QEDGE_KEY.to_string(),
            disease_curie: disease.curie.clone(),
        })
    }

    fn init_extend(
        &self,
        response: &mut Response,
        target_qedge: String,
        disease: &DiseaseSeed,
        resolver: &EntityResolver,
    ) -> Result<GraphSlots, GraphError> {
        let mut categories = self.biolink.get_ancestors(DISEASE_CATEGORY);
        match resolver.normalizer_categories(&disease.curie) {
            Ok(extra) => categories.extend(extra),
            Err(err) => {
                let err = GraphError::from(err);
                response.error(
                    format!("could not fetch categories for {}: {}", disease.curie, err),
                    err.error_code(),
                );
                return Err(err);
            }
        }

        let (drug_qnode_key, disease_qnode_key) = {
            let qedge = &response.message().query_graph.edges[&target_qedge];
            (qedge.subject.clone(), qedge.object.clone())
        };
        self.upsert_node(
            &mut response.message_mut().knowledge_graph,
            &disease.curie,
            &disease.name,
            &categories,
            &disease_qnode_key,
        );

        // The edge already carries the inferred predicate; only mark it used.
        mark_filled(response, &target_qedge);
        // Drug categories vary with what the model returns.
        if let Some(qnode) = response
            .message_mut()
            .query_graph
            .nodes
            .get_mut(&drug_qnode_key)
        {
            qnode.categories = Some(vec![NAMED_THING.to_string()]);
        }

        Ok(GraphSlots {
            mode: GraphMode::Extend {
                target_qedge: target_qedge.clone(),
            },
            drug_qnode_key,
            disease_qnode_key,
            target_qedge_key: target_qedge,
            disease_curie: disease.curie.clone(),
        })
    }

    /// Inserts the node, or records one more query-node slot on an existing one.
    pub fn upsert_node<'g>(
        &self,
        knowledge_graph: &'g mut KnowledgeGraph,
        key: &str,
        name: &str,
        categories: &[String],
        qnode_key: &str,
    ) -> &'g Node {
        let node = knowledge_graph
            .nodes
            .entry(key.to_string())
            .or_insert_with(|| Node {
                name: Some(name.to_string()),
                categories: ordered_categories(categories),
                attributes: Vec::new(),
                qnode_keys: Vec::new(),
            });
        push_unique(&mut node.qnode_keys, qnode_key);
        node
    }

    /// `{provider}:{subject}-{predicate}-{object}`.
    pub fn edge_key(&self, subject: &str, predicate: &str, object: &str) -> String {
        format!(
            "{}:{}-{}-{}",
            self.knowledge.provider, subject, predicate, object
        )
    }

    /// Inserts the triple once. Later calls only add `qedge_key`; the
    /// attributes written by the first call are kept.
    pub fn upsert_edge<'g>(
        &self,
        knowledge_graph: &'g mut KnowledgeGraph,
        subject: &str,
        predicate: &str,
        object: &str,
        qedge_key: &str,
        extra_attributes: Vec<Attribute>,
    ) -> Result<&'g Edge, GraphError> {
        ensure_endpoints(knowledge_graph, subject, object)?;

        let key = self.edge_key(subject, predicate, object);
        let edge = match knowledge_graph.edges.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut attributes = extra_attributes;
                attributes.push(self.provenance_attribute());
                entry.insert(Edge {
                    subject: subject.to_string(),
                    object: object.to_string(),
                    predicate: predicate.to_string(),
                    attributes,
                    qedge_keys: Vec::new(),
                })
            }
        };
        push_unique(&mut edge.qedge_keys, qedge_key);
        Ok(edge)
    }

    /// Inserts an edge under a caller-chosen key that must not exist yet.
    pub fn insert_edge(
        &self,
        knowledge_graph: &mut KnowledgeGraph,
        key: String,
        edge: Edge,
    ) -> Result<(), GraphError> {
        ensure_endpoints(knowledge_graph, &edge.subject, &edge.object)?;
        match knowledge_graph.edges.entry(key) {
            Entry::Occupied(entry) => Err(GraphError::DuplicateEdgeKey(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(edge);
                Ok(())
            }
        }
    }

    pub fn provenance_attribute(&self) -> Attribute {
        Attribute::new(
            "biolink:aggregator_knowledge_source",
            self.knowledge.provider.clone(),
        )
        .with_value_type("biolink:InformationResource")
        .with_source(self.knowledge.provider.clone())
    }

    /// Attributes carried by a model prediction edge.
    pub fn prediction_attributes(&self, treat_score: f64) -> Vec<Attribute> {
        vec![
            Attribute::new(
                "biolink:aggregator_knowledge_source",
                self.knowledge.aggregator.clone(),
            )
            .with_original_name("provided_by")
            .with_value_type("biolink:InformationResource")
            .with_source(self.knowledge.aggregator.clone()),
            Attribute::new("biolink:computed_value", true)
                .with_value_type("metatype:Boolean")
                .with_source(self.knowledge.reasoner_source.clone())
                .with_description(COMPUTED_VALUE_DESCRIPTION),
            Attribute::new("EDAM:data_0951", treat_score).with_original_name("probability_treats"),
        ]
    }

    /// Predicate for drug-to-disease prediction edges.
    pub fn treat_predicate(&self, response: &Response, slots: &GraphSlots) -> String {
        response
            .message()
            .query_graph
            .edges
            .get(&slots.target_qedge_key)
            .and_then(|qedge| qedge.first_predicate())
            .unwrap_or(self.creative.treat_predicate.as_str())
            .to_string()
    }
}

/// Deduplicated, first-seen order, `NamedThing` moved to the end.
pub fn ordered_categories(categories: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(categories.len() + 1);
    for category in categories.iter().filter(|c| c.as_str() != NAMED_THING) {
        push_unique(&mut ordered, category);
    }
    ordered.push(NAMED_THING.to_string());
    ordered
}

fn ensure_endpoints(knowledge_graph: &KnowledgeGraph, subject: &str, object: &str) -> Result<(), GraphError> {
    for endpoint in [subject, object] {
        if !knowledge_graph.nodes.contains_key(endpoint) {
            return Err(GraphError::UnknownNode(endpoint.to_string()));
        }
    }
    Ok(())
}

fn check_status(response: &Response) -> Result<(), GraphError> {
    if response.is_ok() {
        return Ok(());
    }
    let reason = response
        .errors()
        .last()
        .map(|message| message.to_string())
        .unwrap_or_default();
    Err(GraphError::QueryGraph(reason))
}

fn mark_filled(response: &mut Response, qedge_key: &str) {
    if let Some(qedge) = response.message_mut().query_graph.edges.get_mut(qedge_key) {
        qedge.filled = true;
    }
}
