//! RDF namespace and prefix management
//!
//! This module handles namespace prefixes for compact IRI notation.

use super::types::NamedNode;
use indexmap::IndexMap;
use thiserror::Error;

/// Prefix errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Namespace (prefix → IRI mapping)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Prefix
    pub prefix: String,
    /// IRI
    pub iri: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }

    /// Build a term in this namespace (`foaf` + `name` → `foaf:name`'s IRI)
    pub fn term(&self, local: &str) -> PrefixResult<NamedNode> {
        let iri = format!("{}{}", self.iri, local);
        NamedNode::new(&iri).map_err(|_| PrefixError::InvalidIri(iri))
    }
}

/// Namespace manager with the prefixes pods commonly use
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    /// Prefix → IRI mappings, in registration order
    prefixes: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Create a namespace manager with no prefixes
    pub fn empty() -> Self {
        Self {
            prefixes: IndexMap::new(),
        }
    }

    /// Create a new namespace manager with common prefixes
    pub fn new() -> Self {
        use super::vocab::ns;

        let mut mgr = Self::empty();
        mgr.add_prefix("rdf", ns::RDF);
        mgr.add_prefix("rdfs", ns::RDFS);
        mgr.add_prefix("xsd", ns::XSD);
        mgr.add_prefix("foaf", ns::FOAF);
        mgr.add_prefix("space", ns::SPACE);
        mgr.add_prefix("acl", ns::ACL);
        mgr.add_prefix("dct", ns::DCT);
        mgr.add_prefix("sioc", ns::SIOC);
        mgr.add_prefix("ldp", ns::LDP);
        mgr
    }

    /// Add a prefix, replacing any previous mapping for it
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Get the namespace registered under a prefix
    pub fn namespace(&self, prefix: &str) -> PrefixResult<Namespace> {
        self.get_iri(prefix).map(|iri| Namespace::new(prefix, iri))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        if let Some((prefix, local)) = compact_iri.split_once(':') {
            let iri = self.get_iri(prefix)?;
            Ok(format!("{}{}", iri, local))
        } else {
            Err(PrefixError::InvalidIri(compact_iri.to_string()))
        }
    }

    /// Expand a compact IRI straight into a named node
    pub fn expand_node(&self, compact_iri: &str) -> PrefixResult<NamedNode> {
        let iri = self.expand(compact_iri)?;
        NamedNode::new(&iri).map_err(|_| PrefixError::InvalidIri(iri))
    }

    /// Compact an IRI using the longest matching namespace
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, namespace_iri)| iri.starts_with(namespace_iri.as_str()))
            .max_by_key(|(_, namespace_iri)| namespace_iri.len())
            .map(|(prefix, namespace_iri)| format!("{}:{}", prefix, &iri[namespace_iri.len()..]))
    }

    /// Get all registered prefixes
    pub fn prefixes(&self) -> Vec<Namespace> {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| Namespace::new(prefix.clone(), iri.clone()))
            .collect()
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}
