//! Result extraction.
//!
//! [`SubgraphResultifier`] turns a populated knowledge graph into one result per
//! knowledge node bound to the essence query node.

use arax_core::error::ErrorCode;
use arax_core::model::{EdgeBinding, KnowledgeGraph, NodeBinding, QueryGraph, TrapiResult};
use arax_core::response::Response;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResultifyParams {
    #[serde(default)]
    pub ignore_edge_direction: bool,
}

/// Derives `message.results` from the query and knowledge graphs.
///
/// Failures are reported by putting `response` into an error state.
pub trait Resultifier: Send + Sync {
    fn apply(&self, response: &mut Response, params: &ResultifyParams);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubgraphResultifier;

impl SubgraphResultifier {
    pub fn new() -> Self {
        Self
    }
}

impl Resultifier for SubgraphResultifier {
    fn apply(&self, response: &mut Response, params: &ResultifyParams) {
        let message = response.message();
        let Some(essence_qnode) = essence_qnode_key(&message.query_graph) else {
            response.error(
                "Could not determine the essence qnode of the query graph",
                ErrorCode::InvalidArgument,
            );
            return;
        };

        let results = build_results(
            &message.query_graph,
            &message.knowledge_graph,
            &essence_qnode,
            params,
        );
        response.info(format!(
            "Resultify created {} results for essence qnode {}",
            results.len(),
            essence_qnode
        ));
        response.message_mut().results = results;
    }
}

/// The required, non-set query node that is not pinned to identifiers.
fn essence_qnode_key(query_graph: &QueryGraph) -> Option<String> {
    query_graph
        .nodes
        .iter()
        .find(|(_, qnode)| !qnode.is_pinned() && !qnode.is_set && qnode.option_group_id.is_none())
        .map(|(key, _)| key.clone())
}

fn build_results(
    query_graph: &QueryGraph,
    knowledge_graph: &KnowledgeGraph,
    essence_qnode: &str,
    params: &ResultifyParams,
) -> Vec<TrapiResult> {
    let pinned_qnodes: BTreeSet<&str> = query_graph
        .nodes
        .iter()
        .filter(|(_, qnode)| qnode.is_pinned())
        .map(|(key, _)| key.as_str())
        .collect();

    let mut adjacency: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    for (edge_key, edge) in &knowledge_graph.edges {
        adjacency
            .entry(edge.subject.as_str())
            .or_default()
            .push((edge_key.as_str(), edge.object.as_str()));
        if params.ignore_edge_direction && edge.subject != edge.object {
            adjacency
                .entry(edge.object.as_str())
                .or_default()
                .push((edge_key.as_str(), edge.subject.as_str()));
        }
    }

    let essence_nodes: BTreeSet<&str> = knowledge_graph
        .nodes
        .iter()
        .filter(|(_, node)| node.qnode_keys.iter().any(|key| key == essence_qnode))
        .map(|(key, _)| key.as_str())
        .collect();

    let mut results = Vec::with_capacity(essence_nodes.len());
    for &start in &essence_nodes {
        let mut visited: BTreeSet<&str> = BTreeSet::from([start]);
        let mut edges: BTreeSet<&str> = BTreeSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            // Pinned nodes anchor a result; expanding through them would pull in
            // every other result's subgraph.
            if current != start && is_pinned_only(knowledge_graph, current, &pinned_qnodes) {
                continue;
            }
            for &(edge_key, neighbor) in adjacency.get(current).into_iter().flatten() {
                if neighbor != start && essence_nodes.contains(neighbor) {
                    continue;
                }
                edges.insert(edge_key);
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        let mut node_bindings: BTreeMap<String, Vec<NodeBinding>> = BTreeMap::new();
        for node_id in &visited {
            if let Some(node) = knowledge_graph.nodes.get(*node_id) {
                for qnode_key in &node.qnode_keys {
                    node_bindings
                        .entry(qnode_key.clone())
                        .or_default()
                        .push(NodeBinding {
                            id: node_id.to_string(),
                        });
                }
            }
        }

        let mut edge_bindings: BTreeMap<String, Vec<EdgeBinding>> = BTreeMap::new();
        for edge_key in &edges {
            for qedge_key in &knowledge_graph.edges[*edge_key].qedge_keys {
                edge_bindings
                    .entry(qedge_key.clone())
                    .or_default()
                    .push(EdgeBinding {
                        id: edge_key.to_string(),
                    });
            }
        }

        let node = &knowledge_graph.nodes[start];
        results.push(TrapiResult {
            essence: node.name.clone().unwrap_or_else(|| start.to_string()),
            essence_category: node.categories.first().cloned(),
            node_bindings,
            edge_bindings,
            score: None,
        });
    }

    results
}

fn is_pinned_only(knowledge_graph: &KnowledgeGraph, node_id: &str, pinned_qnodes: &BTreeSet<&str>) -> bool {
    knowledge_graph.nodes.get(node_id).is_some_and(|node| {
        !node.qnode_keys.is_empty()
            && node
                .qnode_keys
                .iter()
                .all(|key| pinned_qnodes.contains(key.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arax_core::model::{Edge, Message, Node, QEdge, QNode};

    fn node(name: &str, qnode_key: &str) -> Node {
        Node {
            name: Some(name.to_string()),
            categories: vec!["biolink:NamedThing".to_string()],
            attributes: vec![],
            qnode_keys: vec![qnode_key.to_string()],
        }
    }

    fn edge(subject: &str, object: &str, qedge_key: &str) -> Edge {
        Edge {
            subject: subject.to_string(),
            object: object.to_string(),
            predicate: "biolink:related_to".to_string(),
            attributes: vec![],
            qedge_keys: vec![qedge_key.to_string()],
        }
    }

    fn message() -> Message {
        let mut message = Message::default();
        let qg = &mut message.query_graph;
        qg.nodes.insert(
            "disease".to_string(),
            QNode {
                ids: Some(vec!["MONDO:1".to_string()]),
                ..QNode::default()
            },
        );
        qg.nodes.insert("drug".to_string(), QNode::default());
        qg.edges
            .insert("t".to_string(), QEdge::new("drug", "disease"));

        let kg = &mut message.knowledge_graph;
        kg.nodes.insert("MONDO:1".to_string(), node("Flu", "disease"));
        kg.nodes.insert("CHEBI:1".to_string(), node("Aspirin", "drug"));
        kg.nodes.insert("CHEBI:2".to_string(), node("Ibuprofen", "drug"));
        kg.edges.insert("e1".to_string(), edge("CHEBI:1", "MONDO:1", "t"));
        kg.edges.insert("e2".to_string(), edge("CHEBI:2", "MONDO:1", "t"));
        message
    }

    #[test]
    fn test_one_result_per_essence_node() {
        let mut response = Response::with_message(message());
        SubgraphResultifier::new().apply(
            &mut response,
            &ResultifyParams {
                ignore_edge_direction: true,
            },
        );

        let results = &response.message().results;
        assert_eq!(results.len(), 2);
        let aspirin = results.iter().find(|r| r.essence == "Aspirin").unwrap();
        assert_eq!(aspirin.edge_bindings["t"].len(), 1);
        assert_eq!(aspirin.edge_bindings["t"][0].id, "e1");
        assert_eq!(aspirin.node_bindings["disease"][0].id, "MONDO:1");
    }

    #[test]
    fn test_directed_mode_ignores_reverse_edges() {
        let mut msg = message();
        msg.knowledge_graph
            .edges
            .insert("e3".to_string(), edge("MONDO:1", "CHEBI:1", "t"));
        let mut response = Response::with_message(msg);
        SubgraphResultifier::new().apply(&mut response, &ResultifyParams::default());

        let aspirin = response
            .message()
            .results
            .iter()
            .find(|r| r.essence == "Aspirin")
            .unwrap();
        let bound: Vec<&str> = aspirin.edge_bindings["t"].iter().map(|b| b.id.as_str()).collect();
        assert_eq!(bound, vec!["e1"]);
    }

    #[test]
    fn test_missing_essence_qnode_is_an_error() {
        let mut response = Response::new();
        SubgraphResultifier::new().apply(&mut response, &ResultifyParams::default());
        assert!(!response.is_ok());
    }
}
