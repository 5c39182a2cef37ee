pub mod allocator;
pub mod creative;
pub mod decorator;
pub mod expansion;
pub mod fallback;
pub mod graph_builder;
pub mod input;
pub mod path;
pub mod resultify;
pub mod scoring;

pub use allocator::IdAllocator;
pub use creative::{CreativeDtd, CreativeError, CreativeOutcome};
pub use graph_builder::{GraphBuilder, GraphError, GraphMode, GraphSlots};
pub use input::{DrugPrediction, PairPaths, ScoredPath};
pub use resultify::{ResultifyParams, Resultifier, SubgraphResultifier};
