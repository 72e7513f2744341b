//! RDF/XML format implementation (read only)

use super::turtle::collect_triples;
use super::ParseResult;
use crate::rdf::Triple;
use oxiri::Iri;
use rio_xml::RdfXmlParser;
use std::io::{BufReader, Cursor};

/// RDF/XML parser
pub struct RdfXmlParserWrapper;

impl RdfXmlParserWrapper {
    /// Parse RDF/XML string to Triples
    pub fn parse(input: &str, base_iri: Option<Iri<String>>) -> ParseResult<Vec<Triple>> {
        let reader = BufReader::new(Cursor::new(input));
        let mut parser = RdfXmlParser::new(reader, base_iri);
        collect_triples(&mut parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdfxml_profile() {
        let input = r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:foaf="http://xmlns.com/foaf/0.1/">
  <rdf:Description rdf:about="#me">
    <foaf:name>Alice</foaf:name>
  </rdf:Description>
</rdf:RDF>"##;
        let base = Iri::parse("https://alice.example/profile/card".to_string()).unwrap();
        let triples = RdfXmlParserWrapper::parse(input, Some(base)).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject.value(), "https://alice.example/profile/card#me");
        assert_eq!(triples[0].object.value(), "Alice");
    }
}
