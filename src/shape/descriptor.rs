//! Shape descriptors

use super::{ShapeError, ShapeResult};
use crate::rdf::{NamedNode, RdfPredicate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a scalar value is written as an RDF object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    /// A plain literal
    Literal,
    /// An IRI reference
    Reference,
}

/// One property of a shape
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// The subject's own URI; never read from or written to the graph
    Identity,

    /// A single literal or reference value
    Scalar {
        predicate: RdfPredicate,
        default: Option<String>,
        term: TermKind,
    },

    /// A nested object governed by another shape, written under the
    /// fragment `#reference` of the outer subject's document
    Embedded {
        predicate: RdfPredicate,
        reference: String,
        shape: Arc<Shape>,
    },
}

impl Property {
    pub fn predicate(&self) -> Option<&RdfPredicate> {
        match self {
            Property::Identity => None,
            Property::Scalar { predicate, .. } | Property::Embedded { predicate, .. } => {
                Some(predicate)
            }
        }
    }
}

/// A named schema for a kind of resource
///
/// Shapes are immutable once built and shared through `Arc`; nesting
/// happens by handing a built shape to [`ShapeBuilder::embedded`], so a
/// shape tree cannot contain itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    name: String,
    type_term: Option<NamedNode>,
    properties: IndexMap<String, Property>,
    prefix_hint: Option<String>,
}

impl Shape {
    pub fn builder(name: impl Into<String>) -> ShapeBuilder {
        ShapeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class of matching subjects; `None` for shapes read at a known subject
    pub fn type_term(&self) -> Option<&NamedNode> {
        self.type_term.as_ref()
    }

    /// Properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn prefix_hint(&self) -> Option<&str> {
        self.prefix_hint.as_deref()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Builder for [`Shape`]
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    name: String,
    type_term: Option<NamedNode>,
    properties: Vec<(String, Property)>,
    prefix_hint: Option<String>,
}

impl ShapeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_term: None,
            properties: Vec::new(),
            prefix_hint: None,
        }
    }

    pub fn type_term(mut self, class: NamedNode) -> Self {
        self.type_term = Some(class);
        self
    }

    pub fn prefix_hint(mut self, hint: impl Into<String>) -> Self {
        self.prefix_hint = Some(hint.into());
        self
    }

    /// A property resolving to the subject's URI
    pub fn identity(self, name: impl Into<String>) -> Self {
        self.property(name, Property::Identity)
    }

    pub fn literal(self, name: impl Into<String>, predicate: impl Into<RdfPredicate>) -> Self {
        self.scalar(name, predicate, TermKind::Literal, None)
    }

    pub fn reference(self, name: impl Into<String>, predicate: impl Into<RdfPredicate>) -> Self {
        self.scalar(name, predicate, TermKind::Reference, None)
    }

    pub fn scalar(
        self,
        name: impl Into<String>,
        predicate: impl Into<RdfPredicate>,
        term: TermKind,
        default: Option<String>,
    ) -> Self {
        self.property(
            name,
            Property::Scalar {
                predicate: predicate.into(),
                default,
                term,
            },
        )
    }

    pub fn embedded(
        self,
        name: impl Into<String>,
        predicate: impl Into<RdfPredicate>,
        reference: impl Into<String>,
        shape: Arc<Shape>,
    ) -> Self {
        self.property(
            name,
            Property::Embedded {
                predicate: predicate.into(),
                reference: reference.into(),
                shape,
            },
        )
    }

    pub fn property(mut self, name: impl Into<String>, property: Property) -> Self {
        self.properties.push((name.into(), property));
        self
    }

    pub fn build(self) -> ShapeResult<Shape> {
        let mut properties = IndexMap::with_capacity(self.properties.len());
        for (name, property) in self.properties {
            if let Property::Embedded { reference, .. } = &property {
                if !valid_fragment(reference) {
                    return Err(ShapeError::InvalidFragment {
                        property: name,
                        reference: reference.clone(),
                    });
                }
            }
            if properties.contains_key(&name) {
                return Err(ShapeError::DuplicateProperty {
                    shape: self.name,
                    property: name,
                });
            }
            properties.insert(name, property);
        }

        Ok(Shape {
            name: self.name,
            type_term: self.type_term,
            properties,
            prefix_hint: self.prefix_hint,
        })
    }
}

fn valid_fragment(reference: &str) -> bool {
    !reference.is_empty()
        && reference
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '#' | '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`'))
}
