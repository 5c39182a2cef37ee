//! Query graph mutation.
//!
//! Failures are recorded on the [`Response`] rather than returned, so a caller
//! checks `response.is_ok()` after each call.

use crate::error::ErrorCode;
use crate::model::{QEdge, QNode};
use crate::response::Response;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AddQNodeParams {
    pub key: String,
    /// A single CURIE that pins the node; merged into `ids`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub is_set: bool,
    #[serde(default)]
    pub option_group_id: Option<String>,
}

impl AddQNodeParams {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AddQEdgeParams {
    pub key: String,
    pub subject: String,
    pub object: String,
    #[serde(default)]
    pub predicates: Vec<String>,
    #[serde(default)]
    pub knowledge_type: Option<String>,
    #[serde(default)]
    pub option_group_id: Option<String>,
}

impl AddQEdgeParams {
    pub fn new(
        key: impl Into<String>,
        subject: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            subject: subject.into(),
            object: object.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Messenger;

impl Messenger {
    pub fn new() -> Self {
        Self
    }

    pub fn add_qnode(&self, response: &mut Response, params: AddQNodeParams) {
        if params.key.trim().is_empty() {
            response.error("add_qnode requires a non-empty key", ErrorCode::InvalidArgument);
            return;
        }
        if response.message().query_graph.nodes.contains_key(&params.key) {
            response.error(
                format!("qnode key {} already exists in the query graph", params.key),
                ErrorCode::InvalidArgument,
            );
            return;
        }

        let mut ids = params.ids;
        if let Some(name) = params.name {
            if !ids.contains(&name) {
                ids.insert(0, name);
            }
        }

        let qnode = QNode {
            ids: (!ids.is_empty()).then_some(ids),
            categories: (!params.categories.is_empty()).then_some(params.categories),
            is_set: params.is_set,
            option_group_id: params.option_group_id,
        };
        response.debug(format!("Adding qnode {}", params.key));
        response
            .message_mut()
            .query_graph
            .nodes
            .insert(params.key, qnode);
    }

    pub fn add_qedge(&self, response: &mut Response, params: AddQEdgeParams) {
        if params.key.trim().is_empty() {
            response.error("add_qedge requires a non-empty key", ErrorCode::InvalidArgument);
            return;
        }
        let query_graph = &response.message().query_graph;
        if query_graph.edges.contains_key(&params.key) {
            response.error(
                format!("qedge key {} already exists in the query graph", params.key),
                ErrorCode::InvalidArgument,
            );
            return;
        }
        for endpoint in [&params.subject, &params.object] {
            if !query_graph.nodes.contains_key(endpoint.as_str()) {
                response.error(
                    format!(
                        "qedge {} references qnode {} which is not in the query graph",
                        params.key, endpoint
                    ),
                    ErrorCode::InvalidArgument,
                );
                return;
            }
        }

        let mut qedge = QEdge::new(params.subject, params.object);
        qedge.predicates = (!params.predicates.is_empty()).then_some(params.predicates);
        qedge.knowledge_type = params.knowledge_type;
        qedge.option_group_id = params.option_group_id;
        response.debug(format!("Adding qedge {}", params.key));
        response
            .message_mut()
            .query_graph
            .edges
            .insert(params.key, qedge);
    }
}
