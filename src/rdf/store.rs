//! In-memory RDF graph
//!
//! Triples are kept in insertion order so that "any matching value"
//! lookups and serialized output are deterministic.

use super::types::{RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;

/// Insertion-ordered triple set with a subject index
///
/// The subject index maps a subject to the positions of its triples in
/// the primary set, giving `find_any` and subject-bound `match_all`
/// lookups without a full scan. Triples are never removed, so positions
/// stay valid for the lifetime of the graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// All triples (primary storage)
    triples: IndexSet<Triple>,

    /// Subject -> positions in `triples`
    subject_index: FxHashMap<RdfSubject, Vec<usize>>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement; returns false if it was already present
    pub fn add(
        &mut self,
        subject: impl Into<RdfSubject>,
        predicate: impl Into<RdfPredicate>,
        object: impl Into<RdfObject>,
    ) -> bool {
        self.insert(Triple::new(subject.into(), predicate.into(), object.into()))
    }

    /// Insert a triple; returns false if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        let subject = triple.subject.clone();
        let (position, inserted) = self.triples.insert_full(triple);
        if inserted {
            self.subject_index.entry(subject).or_default().push(position);
        }
        inserted
    }

    /// Insert every triple from an iterator
    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) {
        for triple in triples {
            self.insert(triple);
        }
    }

    /// Check if a triple exists in the graph
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Get the total number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// All triples matching a pattern, in insertion order
    pub fn match_all<'a>(&'a self, pattern: &'a TriplePattern) -> Vec<&'a Triple> {
        match &pattern.subject {
            Some(subject) => self
                .triples_with_subject(subject)
                .filter(|triple| pattern.matches(triple))
                .collect(),
            None => self
                .triples
                .iter()
                .filter(|triple| pattern.matches(triple))
                .collect(),
        }
    }

    /// The first object linked to `subject` through `predicate`
    pub fn find_any(&self, subject: &RdfSubject, predicate: &RdfPredicate) -> Option<&RdfObject> {
        self.triples_with_subject(subject)
            .find(|triple| &triple.predicate == predicate)
            .map(|triple| &triple.object)
    }

    /// Distinct subjects carrying `(subject, type_predicate, class)`, first-seen order
    pub fn subjects_of_type(&self, type_predicate: &RdfPredicate, class: &RdfObject) -> Vec<RdfSubject> {
        let pattern = TriplePattern::new(None, Some(type_predicate.clone()), Some(class.clone()));
        let mut subjects: IndexSet<RdfSubject> = IndexSet::new();
        for triple in self.match_all(&pattern) {
            subjects.insert(triple.subject.clone());
        }
        subjects.into_iter().collect()
    }

    fn triples_with_subject<'a>(&'a self, subject: &RdfSubject) -> impl Iterator<Item = &'a Triple> + 'a {
        self.subject_index
            .get(subject)
            .into_iter()
            .flatten()
            .filter_map(|&position| self.triples.get_index(position))
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        graph.extend(iter);
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::types::{Literal, NamedNode};

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn pred(iri: &str) -> RdfPredicate {
        RdfPredicate::new(iri).unwrap()
    }

    #[test]
    fn test_add_and_duplicate() {
        let mut graph = Graph::new();
        let alice = node("http://example.org/alice");
        let name = pred("http://xmlns.com/foaf/0.1/name");

        assert!(graph.add(alice.clone(), name.clone(), Literal::new_simple_literal("Alice")));
        assert!(!graph.add(alice, name, Literal::new_simple_literal("Alice")));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_find_any_returns_first_inserted() {
        let mut graph = Graph::new();
        let alice: RdfSubject = node("http://example.org/alice").into();
        let nick = pred("http://xmlns.com/foaf/0.1/nick");

        graph.add(alice.clone(), nick.clone(), Literal::new_simple_literal("al"));
        graph.add(alice.clone(), nick.clone(), Literal::new_simple_literal("ally"));

        assert_eq!(graph.find_any(&alice, &nick).unwrap().value(), "al");

        let bob: RdfSubject = node("http://example.org/bob").into();
        assert!(graph.find_any(&bob, &nick).is_none());
    }

    #[test]
    fn test_match_all_with_and_without_subject() {
        let mut graph = Graph::new();
        let name = pred("http://xmlns.com/foaf/0.1/name");
        graph.add(node("http://example.org/alice"), name.clone(), Literal::new_simple_literal("Alice"));
        graph.add(node("http://example.org/bob"), name.clone(), Literal::new_simple_literal("Bob"));

        let by_predicate = TriplePattern::new(None, Some(name.clone()), None);
        assert_eq!(graph.match_all(&by_predicate).len(), 2);

        let by_subject = TriplePattern::new(Some(node("http://example.org/bob").into()), None, None);
        let results = graph.match_all(&by_subject);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].object.value(), "Bob");

        assert_eq!(graph.match_all(&TriplePattern::default()).len(), 2);
    }

    #[test]
    fn test_subjects_of_type_dedups_in_order() {
        let mut graph = Graph::new();
        let rdf_type = pred("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
        let post: RdfObject = node("http://rdfs.org/sioc/ns#Post").into();
        let other: RdfObject = node("http://rdfs.org/sioc/ns#Item").into();

        graph.add(node("http://example.org/p2"), rdf_type.clone(), post.clone());
        graph.add(node("http://example.org/p1"), rdf_type.clone(), post.clone());
        graph.add(node("http://example.org/p2"), rdf_type.clone(), other);

        let subjects = graph.subjects_of_type(&rdf_type, &post);
        let values: Vec<&str> = subjects.iter().map(|s| s.value()).collect();
        assert_eq!(values, vec!["http://example.org/p2", "http://example.org/p1"]);
    }
}
