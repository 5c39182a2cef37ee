//! Parsing of the model's delimited explanatory path strings.

/// `node, predicate, node, ..., node` tokens of one path variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanatoryPath {
    tokens: Vec<String>,
}

/// One `subject -predicate-> object` step of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop<'a> {
    pub subject: &'a str,
    pub predicate: &'a str,
    pub object: &'a str,
}

impl ExplanatoryPath {
    pub fn parse(raw: &str, delimiter: &str) -> Self {
        Self {
            tokens: raw.split(delimiter).map(str::to_string).collect(),
        }
    }

    /// Number of edges, or `None` when the tokens do not alternate
    /// node/predicate and end on a node.
    pub fn hop_count(&self) -> Option<usize> {
        if self.tokens.len() % 2 == 0 {
            return None;
        }
        Some((self.tokens.len() - 1) / 2)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().step_by(2).map(String::as_str)
    }

    pub fn first_node(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn hops(&self) -> Vec<Hop<'_>> {
        let hops = self.hop_count().unwrap_or_default();
        (0..hops)
            .map(|i| Hop {
                subject: &self.tokens[2 * i],
                predicate: &self.tokens[2 * i + 1],
                object: &self.tokens[2 * i + 2],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_hop_path() {
        let path = ExplanatoryPath::parse(
            "Aspirin->biolink:affects->ProteinX->biolink:affects->Flu",
            "->",
        );
        assert_eq!(path.hop_count(), Some(2));
        assert_eq!(
            path.node_names().collect::<Vec<_>>(),
            vec!["Aspirin", "ProteinX", "Flu"]
        );
        let hops = path.hops();
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[1].subject, "ProteinX");
        assert_eq!(hops[1].object, "Flu");
    }

    #[test]
    fn test_empty_path_has_zero_hops() {
        let path = ExplanatoryPath::parse("", "->");
        assert_eq!(path.hop_count(), Some(0));
        assert!(path.hops().is_empty());
    }

    #[test]
    fn test_dangling_predicate_is_malformed() {
        let path = ExplanatoryPath::parse("Aspirin->biolink:affects", "->");
        assert_eq!(path.hop_count(), None);
        assert!(path.hops().is_empty());
    }
}
