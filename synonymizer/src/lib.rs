pub mod biolink;
pub mod node_synonymizer;
pub mod resolver;

pub use biolink::BiolinkHelper;
pub use node_synonymizer::{CanonicalInfo, InMemorySynonymizer, NodeSynonymizer, SynonymEntry};
pub use resolver::{EntityResolver, ResolvedEntities, ResolvedEntity, SynonymizerError};
