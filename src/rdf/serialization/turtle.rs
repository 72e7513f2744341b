//! Turtle and N-Triples format implementation

use super::{ParseError, ParseResult, SerializeError, SerializeResult};
use crate::rdf::{BlankNode, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple};
use oxiri::Iri;
use rio_api::formatter::TriplesFormatter;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleFormatter, TurtleParser};
use std::io::{BufReader, Cursor};

/// Turtle parser
pub struct TurtleParserWrapper;

impl TurtleParserWrapper {
    /// Parse Turtle string to Triples
    pub fn parse(input: &str, base_iri: Option<Iri<String>>) -> ParseResult<Vec<Triple>> {
        let reader = BufReader::new(Cursor::new(input));
        let mut parser = TurtleParser::new(reader, base_iri);
        collect_triples(&mut parser)
    }
}

/// N-Triples parser
pub struct NTriplesParserWrapper;

impl NTriplesParserWrapper {
    /// Parse N-Triples string to Triples
    pub fn parse(input: &str) -> ParseResult<Vec<Triple>> {
        let reader = BufReader::new(Cursor::new(input));
        let mut parser = NTriplesParser::new(reader);
        collect_triples(&mut parser)
    }
}

pub(super) fn collect_triples<P>(parser: &mut P) -> ParseResult<Vec<Triple>>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let mut triples = Vec::new();
    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        let subject = convert_subject(t.subject)?;
        let predicate = convert_predicate(t.predicate)?;
        let object = convert_object(t.object)?;
        triples.push(Triple::new(subject, predicate, object));
        Ok(())
    })?;
    Ok(triples)
}

/// Turtle serializer
pub struct TurtleSerializerWrapper;

impl TurtleSerializerWrapper {
    /// Serialize Triples to Turtle string
    pub fn serialize<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> SerializeResult<String> {
        let mut output = Vec::new();
        let mut formatter = TurtleFormatter::new(&mut output);
        format_all(&mut formatter, triples)?;
        formatter.finish()?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

/// N-Triples serializer
pub struct NTriplesSerializerWrapper;

impl NTriplesSerializerWrapper {
    /// Serialize Triples to N-Triples string
    pub fn serialize<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> SerializeResult<String> {
        let mut output = Vec::new();
        let mut formatter = NTriplesFormatter::new(&mut output);
        format_all(&mut formatter, triples)?;
        formatter.finish()?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

fn format_all<'a, F>(formatter: &mut F, triples: impl IntoIterator<Item = &'a Triple>) -> SerializeResult<()>
where
    F: TriplesFormatter,
{
    for triple in triples {
        let s_node;
        let s_blank;
        let subject = match &triple.subject {
            RdfSubject::NamedNode(n) => {
                s_node = model::NamedNode { iri: n.as_str() };
                model::Subject::NamedNode(s_node)
            }
            RdfSubject::BlankNode(b) => {
                s_blank = model::BlankNode { id: b.as_str() };
                model::Subject::BlankNode(s_blank)
            }
        };

        let predicate = model::NamedNode {
            iri: triple.predicate.as_named_node().as_str(),
        };

        let o_datatype;
        let object = match &triple.object {
            RdfObject::NamedNode(n) => model::Term::NamedNode(model::NamedNode { iri: n.as_str() }),
            RdfObject::BlankNode(b) => model::Term::BlankNode(model::BlankNode { id: b.as_str() }),
            RdfObject::Literal(l) => {
                if let Some(language) = l.language() {
                    model::Term::Literal(model::Literal::LanguageTaggedString {
                        value: l.value(),
                        language,
                    })
                } else {
                    o_datatype = l.datatype();
                    if o_datatype.as_str() == XSD_STRING {
                        model::Term::Literal(model::Literal::Simple { value: l.value() })
                    } else {
                        model::Term::Literal(model::Literal::Typed {
                            value: l.value(),
                            datatype: model::NamedNode {
                                iri: o_datatype.as_str(),
                            },
                        })
                    }
                }
            }
        };

        let rio_triple = model::Triple {
            subject,
            predicate,
            object,
        };

        formatter
            .format(&rio_triple)
            .map_err(|e| SerializeError::Serialize(e.to_string()))?;
    }
    Ok(())
}

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

fn convert_subject(s: model::Subject) -> ParseResult<RdfSubject> {
    match s {
        model::Subject::NamedNode(n) => Ok(RdfSubject::NamedNode(convert_named_node(n)?)),
        model::Subject::BlankNode(b) => Ok(RdfSubject::BlankNode(
            BlankNode::from_id(b.id).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        _ => Err(ParseError::Parse("Unsupported subject type".to_string())),
    }
}

fn convert_predicate(p: model::NamedNode) -> ParseResult<RdfPredicate> {
    Ok(convert_named_node(p)?.into())
}

fn convert_named_node(n: model::NamedNode) -> ParseResult<NamedNode> {
    NamedNode::new(n.iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_object(o: model::Term) -> ParseResult<RdfObject> {
    match o {
        model::Term::NamedNode(n) => Ok(RdfObject::NamedNode(convert_named_node(n)?)),
        model::Term::BlankNode(b) => Ok(RdfObject::BlankNode(
            BlankNode::from_id(b.id).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        model::Term::Literal(l) => match l {
            model::Literal::Simple { value } => Ok(RdfObject::Literal(Literal::new_simple_literal(value))),
            model::Literal::LanguageTaggedString { value, language } => Ok(RdfObject::Literal(
                Literal::new_language_tagged_literal(value, language)
                    .map_err(|e| ParseError::Parse(e.to_string()))?,
            )),
            model::Literal::Typed { value, datatype } => {
                let dt = convert_named_node(datatype)?;
                Ok(RdfObject::Literal(Literal::new_typed_literal(value, dt)))
            }
        },
        _ => Err(ParseError::Parse("Unsupported object type".to_string())),
    }
}
