//! Populated shapes ready for writing

use super::{Property, Shape, ShapeError, ShapeResult};
use crate::rdf::{Literal, NamedNode, RdfObject};
use indexmap::IndexMap;
use std::sync::Arc;

/// A value assigned to one property of a [`ShapeInstance`]
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceValue {
    /// Text turned into a literal or IRI according to the property's term kind
    Text(String),
    /// A ready-made RDF term, written as-is
    Term(RdfObject),
    /// A nested object for an embedded property
    Embedded(ShapeInstance),
}

impl From<&str> for InstanceValue {
    fn from(value: &str) -> Self {
        InstanceValue::Text(value.to_string())
    }
}

impl From<String> for InstanceValue {
    fn from(value: String) -> Self {
        InstanceValue::Text(value)
    }
}

impl From<RdfObject> for InstanceValue {
    fn from(term: RdfObject) -> Self {
        InstanceValue::Term(term)
    }
}

impl From<Literal> for InstanceValue {
    fn from(literal: Literal) -> Self {
        InstanceValue::Term(literal.into())
    }
}

impl From<NamedNode> for InstanceValue {
    fn from(node: NamedNode) -> Self {
        InstanceValue::Term(node.into())
    }
}

impl From<ShapeInstance> for InstanceValue {
    fn from(instance: ShapeInstance) -> Self {
        InstanceValue::Embedded(instance)
    }
}

/// A shape together with the values to write for it
///
/// Properties left unset produce no triples.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeInstance {
    shape: Arc<Shape>,
    values: IndexMap<String, InstanceValue>,
}

impl ShapeInstance {
    pub fn new(shape: Arc<Shape>) -> Self {
        Self {
            shape,
            values: IndexMap::new(),
        }
    }

    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// Assign a property, checking it exists and accepts this kind of value
    pub fn set(&mut self, name: &str, value: impl Into<InstanceValue>) -> ShapeResult<&mut Self> {
        let value = value.into();
        let property = self
            .shape
            .property(name)
            .ok_or_else(|| ShapeError::UnknownProperty {
                shape: self.shape.name().to_string(),
                property: name.to_string(),
            })?;

        let mismatch = |expected: String| ShapeError::KindMismatch {
            property: name.to_string(),
            expected,
        };
        match (property, &value) {
            (Property::Identity, _) => {
                return Err(mismatch("no value, it is the subject URI".to_string()))
            }
            (Property::Scalar { .. }, InstanceValue::Embedded(_)) => {
                return Err(mismatch("a text or term value".to_string()))
            }
            (Property::Embedded { shape, .. }, InstanceValue::Embedded(nested)) => {
                if nested.shape().name() != shape.name() {
                    return Err(mismatch(format!("an embedded {}", shape.name())));
                }
            }
            (Property::Embedded { shape, .. }, _) => {
                return Err(mismatch(format!("an embedded {}", shape.name())))
            }
            (Property::Scalar { .. }, _) => {}
        }

        self.values.insert(name.to_string(), value);
        Ok(self)
    }

    /// Builder-style [`ShapeInstance::set`]
    pub fn with(mut self, name: &str, value: impl Into<InstanceValue>) -> ShapeResult<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Remove a value; the property goes back to producing nothing
    pub fn unset(&mut self, name: &str) -> Option<InstanceValue> {
        self.values.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&InstanceValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
