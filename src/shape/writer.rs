//! Object to graph emission

use super::{InstanceValue, Property, ShapeError, ShapeInstance, ShapeResult, TermKind};
use crate::rdf::{Graph, Literal, NamedNode, RdfObject, Vocabulary};

/// Emit the triples for `instance` at `subject` into `graph`
///
/// The type triple comes first when the shape has a type term. Unset
/// properties and identity properties produce nothing. An embedded value
/// is written under `<document of subject>#<reference>` and linked from
/// `subject`; with a relative subject such as `<>` the nested node is the
/// relative `<#reference>`.
///
/// On error `graph` is left unchanged.
pub fn write(
    graph: &mut Graph,
    vocab: &Vocabulary,
    subject: &NamedNode,
    instance: &ShapeInstance,
) -> ShapeResult<()> {
    let mut emitted = Graph::new();
    emit(&mut emitted, vocab, subject, instance)?;
    graph.extend(emitted.iter().cloned());
    Ok(())
}

fn emit(
    graph: &mut Graph,
    vocab: &Vocabulary,
    subject: &NamedNode,
    instance: &ShapeInstance,
) -> ShapeResult<()> {
    let shape = instance.shape();
    if let Some(class) = shape.type_term() {
        graph.add(subject.clone(), vocab.rdf_type().clone(), class.clone());
    }

    for (name, property) in shape.properties() {
        let Some(value) = instance.get(name) else {
            continue;
        };

        match (property, value) {
            (Property::Identity, _) => {}

            (Property::Scalar { predicate, term, .. }, InstanceValue::Text(text)) => {
                let object = scalar_term(name, text, *term)?;
                graph.add(subject.clone(), predicate.clone(), object);
            }

            (Property::Scalar { predicate, .. }, InstanceValue::Term(object)) => {
                graph.add(subject.clone(), predicate.clone(), object.clone());
            }

            (
                Property::Embedded {
                    predicate,
                    reference,
                    ..
                },
                InstanceValue::Embedded(nested),
            ) => {
                let fragment = mint_fragment(name, subject, reference)?;
                graph.add(subject.clone(), predicate.clone(), fragment.clone());
                emit(graph, vocab, &fragment, nested)?;
            }

            (Property::Scalar { .. }, InstanceValue::Embedded(_)) => {
                return Err(ShapeError::KindMismatch {
                    property: name.to_string(),
                    expected: "a text or term value".to_string(),
                })
            }

            (Property::Embedded { shape, .. }, _) => {
                return Err(ShapeError::KindMismatch {
                    property: name.to_string(),
                    expected: format!("an embedded {}", shape.name()),
                })
            }
        }
    }
    Ok(())
}

fn scalar_term(property: &str, text: &str, term: TermKind) -> ShapeResult<RdfObject> {
    match term {
        TermKind::Literal => Ok(Literal::new_simple_literal(text).into()),
        TermKind::Reference => NamedNode::new(text)
            .map(RdfObject::from)
            .map_err(|_| ShapeError::InvalidReference {
                property: property.to_string(),
                value: text.to_string(),
            }),
    }
}

fn mint_fragment(property: &str, subject: &NamedNode, reference: &str) -> ShapeResult<NamedNode> {
    let iri = format!("{}#{}", subject.document(), reference);
    if !subject.is_absolute() {
        return Ok(NamedNode::relative(iri));
    }
    NamedNode::new(&iri).map_err(|_| ShapeError::InvalidFragment {
        property: property.to_string(),
        reference: reference.to_string(),
    })
}
