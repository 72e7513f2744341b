//! RDF (Resource Description Framework) support
//!
//! This module is the graph-store collaborator of the pod client:
//! - RDF terms and triples, including document-relative references
//! - An insertion-ordered in-memory graph with pattern matching
//! - Turtle, N-Triples and RDF/XML parsing, Turtle and N-Triples output
//! - Namespace prefixes and the fixed protocol vocabulary
//!
//! # Example
//!
//! ```rust
//! use podkit::rdf::{Graph, NamedNode, Literal, RdfPredicate};
//!
//! let mut graph = Graph::new();
//!
//! let subject = NamedNode::new("http://example.org/alice").unwrap();
//! let predicate = RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! graph.add(subject.clone(), predicate.clone(), Literal::new_simple_literal("Alice"));
//!
//! let name = graph.find_any(&subject.into(), &predicate).unwrap();
//! assert_eq!(name.value(), "Alice");
//! ```

mod namespace;
mod serialization;
mod store;
mod types;
pub mod vocab;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    Triple, TriplePattern,
};

pub use store::Graph;

pub use namespace::{Namespace, NamespaceManager, PrefixError, PrefixResult};

pub use serialization::{
    ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer, SerializeError,
    SerializeResult,
};

pub use vocab::Vocabulary;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_module_exports() {
        let _graph: Graph = Graph::new();
        let _ns_mgr = NamespaceManager::new();
        let _vocab = Vocabulary::default();
    }
}
