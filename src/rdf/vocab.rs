//! Vocabulary terms used by the pod protocol
//!
//! [`ns`] holds the namespace IRIs as static data. [`Vocabulary`] is the
//! immutable record of the fixed terms the reader, writer and pod
//! operations need; it is built once and passed to them explicitly.

use super::namespace::{Namespace, NamespaceManager, PrefixResult};
use super::types::{NamedNode, RdfPredicate};

/// Namespace IRIs
pub mod ns {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
    pub const SPACE: &str = "http://www.w3.org/ns/pim/space#";
    pub const ACL: &str = "http://www.w3.org/ns/auth/acl#";
    pub const DCT: &str = "http://purl.org/dc/terms/";
    pub const SIOC: &str = "http://rdfs.org/sioc/ns#";
    pub const LDP: &str = "http://www.w3.org/ns/ldp#";
}

/// The fixed terms of the pod protocol plus prefix expansion
#[derive(Debug, Clone)]
pub struct Vocabulary {
    namespaces: NamespaceManager,
    rdf_type: RdfPredicate,
    space: NamedNode,
    resource: NamedNode,
    basic_container: NamedNode,
    contains: RdfPredicate,
    uri_prefix: RdfPredicate,
    date_time: NamedNode,
    authorization: NamedNode,
    access_to: RdfPredicate,
    agent: RdfPredicate,
    agent_class: RdfPredicate,
    mode: RdfPredicate,
    public_agent: NamedNode,
}

impl Vocabulary {
    /// Build the vocabulary over a namespace manager
    pub fn new(namespaces: NamespaceManager) -> Self {
        let term = |base: &str, local: &str| NamedNode::trusted(format!("{base}{local}"));
        Self {
            namespaces,
            rdf_type: term(ns::RDF, "type").into(),
            space: term(ns::SIOC, "Space"),
            resource: term(ns::RDFS, "Resource"),
            basic_container: term(ns::LDP, "BasicContainer"),
            contains: term(ns::LDP, "contains").into(),
            uri_prefix: term(ns::SPACE, "uriPrefix").into(),
            date_time: term(ns::XSD, "dateTime"),
            authorization: term(ns::ACL, "Authorization"),
            access_to: term(ns::ACL, "accessTo").into(),
            agent: term(ns::ACL, "agent").into(),
            agent_class: term(ns::ACL, "agentClass").into(),
            mode: term(ns::ACL, "mode").into(),
            public_agent: term(ns::FOAF, "Agent"),
        }
    }

    /// `rdf:type`
    pub fn rdf_type(&self) -> &RdfPredicate {
        &self.rdf_type
    }

    /// `sioc:Space`, the class of workspaces listed in a storage document
    pub fn space(&self) -> &NamedNode {
        &self.space
    }

    /// `rdfs:Resource`, the class servers give container members
    pub fn resource(&self) -> &NamedNode {
        &self.resource
    }

    /// `ldp:BasicContainer`
    pub fn basic_container(&self) -> &NamedNode {
        &self.basic_container
    }

    /// `ldp:contains`
    pub fn contains(&self) -> &RdfPredicate {
        &self.contains
    }

    /// `space:uriPrefix`, carries a shape's prefix hint on new containers
    pub fn uri_prefix(&self) -> &RdfPredicate {
        &self.uri_prefix
    }

    /// `xsd:dateTime`
    pub fn date_time(&self) -> &NamedNode {
        &self.date_time
    }

    /// `acl:Authorization`
    pub fn authorization(&self) -> &NamedNode {
        &self.authorization
    }

    /// `acl:accessTo`
    pub fn access_to(&self) -> &RdfPredicate {
        &self.access_to
    }

    /// `acl:agent`
    pub fn agent(&self) -> &RdfPredicate {
        &self.agent
    }

    /// `acl:agentClass`
    pub fn agent_class(&self) -> &RdfPredicate {
        &self.agent_class
    }

    /// `acl:mode`
    pub fn mode(&self) -> &RdfPredicate {
        &self.mode
    }

    /// `foaf:Agent`, the class of every agent (public access)
    pub fn public_agent(&self) -> &NamedNode {
        &self.public_agent
    }

    /// An access mode term: `acl:Read`, `acl:Write`, ...
    pub fn access_mode(&self, mode: &str) -> PrefixResult<NamedNode> {
        Namespace::new("acl", ns::ACL).term(mode)
    }

    /// Expand `prefix:local` into a named node
    pub fn term(&self, compact_iri: &str) -> PrefixResult<NamedNode> {
        self.namespaces.expand_node(compact_iri)
    }

    /// Compact an IRI for display
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.namespaces.compact(iri)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(NamespaceManager::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_terms() {
        let vocab = Vocabulary::default();
        assert_eq!(
            vocab.rdf_type().as_named_node().as_str(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"
        );
        assert_eq!(vocab.space().as_str(), "http://rdfs.org/sioc/ns#Space");
        assert_eq!(vocab.public_agent().as_str(), "http://xmlns.com/foaf/0.1/Agent");
        assert_eq!(vocab.basic_container().as_str(), "http://www.w3.org/ns/ldp#BasicContainer");
    }

    #[test]
    fn test_access_mode_and_term() {
        let vocab = Vocabulary::default();
        assert_eq!(
            vocab.access_mode("Read").unwrap().as_str(),
            "http://www.w3.org/ns/auth/acl#Read"
        );
        assert_eq!(
            vocab.term("dct:title").unwrap().as_str(),
            "http://purl.org/dc/terms/title"
        );
        assert_eq!(vocab.compact("http://rdfs.org/sioc/ns#Post").as_deref(), Some("sioc:Post"));
    }
}
