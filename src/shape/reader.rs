//! Graph to object resolution

use super::{Property, Shape};
use crate::rdf::{Graph, RdfObject, RdfSubject};
use indexmap::IndexMap;
use serde::Serialize;

/// A resolved property value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    Text(String),
    Nested(ResolvedResource),
    /// Not in the graph and no default
    Missing,
}

/// Plain object produced by [`read`], mirroring the shape's property names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedResource {
    /// Subject the values were read from; `None` for an embedded object
    /// whose link was absent
    pub uri: Option<String>,
    /// Container the resource was listed from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_uri: Option<String>,
    pub fields: IndexMap<String, ResolvedValue>,
}

impl ResolvedResource {
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(ResolvedValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn nested(&self, name: &str) -> Option<&ResolvedResource> {
        match self.fields.get(name) {
            Some(ResolvedValue::Nested(nested)) => Some(nested),
            _ => None,
        }
    }
}

/// Resolve `shape` at `subject`
///
/// Each property takes the first matching object in the graph, whatever
/// its term kind, or the property default. Embedded properties recurse
/// into the linked node and fall back to an object of defaults when the
/// link is missing.
pub fn read(graph: &Graph, subject: &RdfSubject, shape: &Shape) -> ResolvedResource {
    read_node(graph, Some(subject), shape)
}

fn read_node(graph: &Graph, subject: Option<&RdfSubject>, shape: &Shape) -> ResolvedResource {
    let mut fields = IndexMap::with_capacity(shape.len());

    for (name, property) in shape.properties() {
        let value = match property {
            Property::Identity => subject
                .map(|s| ResolvedValue::Text(s.value().to_string()))
                .unwrap_or(ResolvedValue::Missing),

            Property::Scalar {
                predicate, default, ..
            } => subject
                .and_then(|s| graph.find_any(s, predicate))
                .map(|object| object.value().to_string())
                .or_else(|| default.clone())
                .map(ResolvedValue::Text)
                .unwrap_or(ResolvedValue::Missing),

            Property::Embedded {
                predicate,
                shape: nested,
                ..
            } => {
                let target = subject
                    .and_then(|s| graph.find_any(s, predicate))
                    .and_then(RdfObject::as_subject);
                ResolvedValue::Nested(read_node(graph, target.as_ref(), nested))
            }
        };
        fields.insert(name.to_string(), value);
    }

    ResolvedResource {
        uri: subject.map(|s| s.value().to_string()),
        container_uri: None,
        fields,
    }
}
