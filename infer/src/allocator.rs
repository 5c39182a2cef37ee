use serde::{Deserialize, Serialize};

const QNODE_PREFIX: &str = "creative_DTD_qnode";
const QEDGE_PREFIX: &str = "creative_DTD_qedge";
const OPTION_GROUP_PREFIX: &str = "creative_DTD_option_group";
const PREDICTION_EDGE_PREFIX: &str = "creative_DTD_prediction";

/// Monotonic source of synthetic query-graph and knowledge-edge keys.
///
/// Counters only move forward. Persist the allocator between runs that extend
/// the same response, otherwise a fresh allocator reissues keys that already
/// exist there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    kedge: u64,
    qedge: u64,
    qnode: u64,
    option_group: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue from counters returned by an earlier run.
    pub fn resume(kedge: u64, qedge: u64, qnode: u64, option_group: u64) -> Self {
        Self {
            kedge,
            qedge,
            qnode,
            option_group,
        }
    }

    /// `(kedge, qedge, qnode, option_group)`: the next value each counter will hand out.
    pub fn counters(&self) -> (u64, u64, u64, u64) {
        (self.kedge, self.qedge, self.qnode, self.option_group)
    }

    pub fn next_qnode_key(&mut self) -> String {
        format!("{}_{}", QNODE_PREFIX, bump(&mut self.qnode))
    }

    pub fn next_qedge_key(&mut self) -> String {
        format!("{}_{}", QEDGE_PREFIX, bump(&mut self.qedge))
    }

    pub fn next_option_group_id(&mut self) -> String {
        format!("{}_{}", OPTION_GROUP_PREFIX, bump(&mut self.option_group))
    }

    pub fn next_prediction_edge_key(&mut self) -> String {
        format!("{}_{}", PREDICTION_EDGE_PREFIX, bump(&mut self.kedge))
    }
}

fn bump(counter: &mut u64) -> u64 {
    let current = *counter;
    *counter += 1;
    current
}
