//! Shape-driven RDF mapping
//!
//! A [`Shape`] declares the properties an application expects on a kind of
//! resource. [`read`] resolves a shape against a graph into a plain
//! [`ResolvedResource`]; [`write`] turns a populated [`ShapeInstance`] back
//! into triples ready for upload.
//!
//! # Example
//!
//! ```rust
//! use podkit::rdf::{Graph, NamedNode, Vocabulary};
//! use podkit::shape::{read, write, Shape, ShapeInstance};
//! use std::sync::Arc;
//!
//! let vocab = Vocabulary::default();
//! let note = Arc::new(
//!     Shape::builder("note")
//!         .type_term(vocab.term("sioc:Post").unwrap())
//!         .identity("uri")
//!         .literal("body", vocab.term("sioc:content").unwrap())
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut instance = ShapeInstance::new(note.clone());
//! instance.set("body", "hello").unwrap();
//!
//! let subject = NamedNode::new("https://pod.example/notes/1").unwrap();
//! let mut graph = Graph::new();
//! write(&mut graph, &vocab, &subject, &instance).unwrap();
//!
//! let resolved = read(&graph, &subject.into(), &note);
//! assert_eq!(resolved.text("body"), Some("hello"));
//! ```

mod catalog;
mod descriptor;
mod instance;
mod reader;
mod writer;

pub use catalog::Catalog;
pub use descriptor::{Property, Shape, ShapeBuilder, TermKind};
pub use instance::{InstanceValue, ShapeInstance};
pub use reader::{read, ResolvedResource, ResolvedValue};
pub use writer::write;

use crate::rdf::{PrefixError, RdfError};
use thiserror::Error;

/// Shape errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Two properties with the same name
    #[error("Shape {shape} declares property {property} twice")]
    DuplicateProperty { shape: String, property: String },

    /// Property not declared by the shape
    #[error("Shape {shape} has no property {property}")]
    UnknownProperty { shape: String, property: String },

    /// Value does not fit the property descriptor
    #[error("Property {property} expects {expected}")]
    KindMismatch {
        property: String,
        expected: String,
    },

    /// Reference-valued property given something that is not an IRI
    #[error("Property {property} expects an IRI, got {value:?}")]
    InvalidReference { property: String, value: String },

    /// Embedded property whose fragment hint cannot name a node
    #[error("Property {property} has invalid fragment reference {reference:?}")]
    InvalidFragment { property: String, reference: String },

    /// Listing needs a type term to select subjects
    #[error("Shape {0} has no type term")]
    Untyped(String),

    /// Vocabulary expansion failure
    #[error(transparent)]
    Prefix(#[from] PrefixError),

    /// Term construction failure
    #[error(transparent)]
    Rdf(#[from] RdfError),
}

pub type ShapeResult<T> = Result<T, ShapeError>;
