//! TRAPI message model.
//!
//! Only the parts of the Translator Reasoner API schema that the reasoning
//! pipeline reads or writes are modelled here. Field names follow the TRAPI
//! wire format so a `Message` round-trips through JSON unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const NAMED_THING: &str = "biolink:NamedThing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub is_set: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_group_id: Option<String>,
}

impl QNode {
    /// A query node pinned to concrete identifiers.
    pub fn is_pinned(&self) -> bool {
        self.ids.as_ref().is_some_and(|ids| !ids.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QEdge {
    pub subject: String,
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_group_id: Option<String>,
    #[serde(default)]
    pub exclude: bool,
    /// Set once the edge has been matched by at least one knowledge edge.
    #[serde(default)]
    pub filled: bool,
}

impl QEdge {
    pub fn new(subject: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            object: object.into(),
            predicates: None,
            knowledge_type: None,
            option_group_id: None,
            exclude: false,
            filled: false,
        }
    }

    pub fn first_predicate(&self) -> Option<&str> {
        self.predicates
            .as_ref()
            .and_then(|predicates| predicates.first())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryGraph {
    #[serde(default)]
    pub nodes: BTreeMap<String, QNode>,
    #[serde(default)]
    pub edges: BTreeMap<String, QEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub attribute_type_id: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_attribute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    pub fn new(attribute_type_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute_type_id: attribute_type_id.into(),
            value: value.into(),
            value_type_id: None,
            attribute_source: None,
            original_attribute_name: None,
            description: None,
        }
    }

    pub fn with_value_type(mut self, value_type_id: impl Into<String>) -> Self {
        self.value_type_id = Some(value_type_id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.attribute_source = Some(source.into());
        self
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_attribute_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Query nodes this knowledge node fulfils. Never holds duplicates.
    #[serde(default)]
    pub qnode_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub subject: String,
    pub object: String,
    pub predicate: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Query edges this knowledge edge fulfils. Never holds duplicates.
    #[serde(default)]
    pub qedge_keys: Vec<String>,
}

impl Edge {
    pub fn attribute(&self, attribute_type_id: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.attribute_type_id == attribute_type_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub nodes: BTreeMap<String, Node>,
    #[serde(default)]
    pub edges: BTreeMap<String, Edge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBinding {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeBinding {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapiResult {
    pub essence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essence_category: Option<String>,
    #[serde(default)]
    pub node_bindings: BTreeMap<String, Vec<NodeBinding>>,
    #[serde(default)]
    pub edge_bindings: BTreeMap<String, Vec<EdgeBinding>>,
    /// `None` marks a result whose essence had no score.
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Message {
    #[serde(default)]
    pub query_graph: QueryGraph,
    #[serde(default)]
    pub knowledge_graph: KnowledgeGraph,
    #[serde(default)]
    pub results: Vec<TrapiResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Envelope {
    pub message: Message,
}

/// Pushes `item` unless already present, keeping first-seen order.
pub fn push_unique(items: &mut Vec<String>, item: &str) -> bool {
    if items.iter().any(|existing| existing == item) {
        return false;
    }
    items.push(item.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qedge_skips_absent_optionals() {
        let edge = QEdge::new("drug", "disease");
        let json = serde_json::to_value(&edge).unwrap();
        assert!(json.get("predicates").is_none());
        assert_eq!(json["filled"], Value::Bool(false));
    }

    #[test]
    fn test_message_deserializes_minimal_trapi() {
        let raw = r#"{
            "query_graph": {
                "nodes": {"n0": {"ids": ["MONDO:0005011"]}, "n1": {"categories": ["biolink:Drug"]}},
                "edges": {"e0": {"subject": "n1", "object": "n0", "predicates": ["biolink:treats"]}}
            }
        }"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert!(message.query_graph.nodes["n0"].is_pinned());
        assert!(!message.query_graph.nodes["n1"].is_pinned());
        assert_eq!(
            message.query_graph.edges["e0"].first_predicate(),
            Some("biolink:treats")
        );
        assert!(message.knowledge_graph.nodes.is_empty());
    }

    #[test]
    fn test_push_unique() {
        let mut keys = vec!["drug".to_string()];
        assert!(!push_unique(&mut keys, "drug"));
        assert!(push_unique(&mut keys, "disease"));
        assert_eq!(keys, vec!["drug", "disease"]);
    }
}
