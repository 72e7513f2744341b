//! RDF serialization formats
//!
//! Supports:
//! - Turtle (TTL), read and write
//! - N-Triples (NT), read and write
//! - RDF/XML, read only

mod rdfxml;
mod turtle;

use super::{Graph, Triple};
use thiserror::Error;

pub use rdfxml::RdfXmlParserWrapper;
pub use turtle::{NTriplesParserWrapper, NTriplesSerializerWrapper, TurtleParserWrapper, TurtleSerializerWrapper};

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// RDF/XML format (.rdf)
    RdfXml,
}

impl RdfFormat {
    /// The canonical media type
    pub fn media_type(&self) -> &'static str {
        match self {
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::NTriples => "application/n-triples",
            RdfFormat::RdfXml => "application/rdf+xml",
        }
    }

    /// Pick a format from a `Content-Type` value, ignoring parameters
    pub fn from_media_type(content_type: &str) -> Option<Self> {
        let mime: mime::Mime = content_type.trim().parse().ok()?;
        // essence keeps structured suffixes such as `+xml`
        match mime.essence_str() {
            "text/turtle" | "application/x-turtle" => Some(RdfFormat::Turtle),
            "application/n-triples" => Some(RdfFormat::NTriples),
            "application/rdf+xml" => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid base IRI
    #[error("Invalid base IRI {0}")]
    InvalidBase(String),
}

impl From<rio_turtle::TurtleError> for ParseError {
    fn from(e: rio_turtle::TurtleError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

impl From<rio_xml::RdfXmlError> for ParseError {
    fn from(e: rio_xml::RdfXmlError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0:?}")]
    UnsupportedFormat(RdfFormat),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse RDF data from a string
    ///
    /// `base` resolves relative IRIs; documents fetched from a pod pass
    /// their own URL.
    pub fn parse(input: &str, format: RdfFormat, base: Option<&str>) -> ParseResult<Vec<Triple>> {
        let base_iri = base
            .map(|b| {
                oxiri::Iri::parse(b.to_string()).map_err(|e| ParseError::InvalidBase(format!("{b}: {e}")))
            })
            .transpose()?;

        match format {
            RdfFormat::Turtle => TurtleParserWrapper::parse(input, base_iri),
            RdfFormat::NTriples => NTriplesParserWrapper::parse(input),
            RdfFormat::RdfXml => RdfXmlParserWrapper::parse(input, base_iri),
        }
    }

    /// Parse RDF data straight into a graph
    pub fn parse_graph(input: &str, format: RdfFormat, base: Option<&str>) -> ParseResult<Graph> {
        Ok(Self::parse(input, format, base)?.into_iter().collect())
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize triples to a string
    pub fn serialize<'a>(
        triples: impl IntoIterator<Item = &'a Triple>,
        format: RdfFormat,
    ) -> SerializeResult<String> {
        match format {
            RdfFormat::Turtle => TurtleSerializerWrapper::serialize(triples),
            RdfFormat::NTriples => NTriplesSerializerWrapper::serialize(triples),
            RdfFormat::RdfXml => Err(SerializeError::UnsupportedFormat(format)),
        }
    }

    /// Serialize a whole graph to a string
    pub fn serialize_graph(graph: &Graph, format: RdfFormat) -> SerializeResult<String> {
        Self::serialize(graph.iter(), format)
    }
}
