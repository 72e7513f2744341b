//! Podkit
//!
//! A client for Linked Data Platform pods: personal data stores that keep
//! RDF documents in containers, guarded by ACL documents.
//!
//! # Architecture
//!
//! - [`rdf`]: triples, the in-memory graph, Turtle / N-Triples / RDF/XML
//!   and the fixed protocol vocabulary
//! - [`link`]: `Link` header parsing, used to discover ACL and metadata
//!   documents
//! - [`shape`]: declarative shapes and the reader/writer that map them to
//!   and from graphs
//! - [`transport`]: the HTTP seam, with a reqwest client and an in-memory
//!   pod
//! - [`pod`]: the multi-request pod protocols
//!
//! ## Example Usage
//!
//! ```rust
//! use podkit::{Catalog, MemoryPod, PodClient};
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let pod = Arc::new(MemoryPod::new());
//! pod.add_container("https://alice.example/mb/").await;
//!
//! let client = PodClient::new(pod.clone());
//! let catalog = Catalog::new(client.vocabulary()).unwrap();
//!
//! let channel = catalog.new_channel("Cooking").unwrap();
//! let created = client
//!     .create_container("https://alice.example/mb/", &channel)
//!     .await
//!     .unwrap();
//!
//! let post = catalog.new_post("First!").unwrap();
//! client.create_resource(&created.container_uri, &post).await.unwrap();
//!
//! let posts = client
//!     .list_resources(&created.container_uri, catalog.post())
//!     .await
//!     .unwrap();
//! assert_eq!(posts.len(), 1);
//! assert_eq!(posts[0].text("body"), Some("First!"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod link;
pub mod pod;
pub mod rdf;
pub mod shape;
pub mod transport;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, PodConfig};

pub use error::{PodError, PodResult};

pub use link::{parse_link_header, Link, LinkError, LinkResult, Links};

pub use pod::{AclGrant, AclUpdate, CreatedContainer, CreatedResource, DeleteReport, PodClient};

pub use rdf::{
    Graph, Literal, NamedNode, NamespaceManager, RdfFormat, RdfObject, RdfPredicate, RdfSubject,
    Triple, Vocabulary,
};

pub use shape::{
    read, write, Catalog, InstanceValue, Property, ResolvedResource, ResolvedValue, Shape,
    ShapeBuilder, ShapeError, ShapeInstance, ShapeResult, TermKind,
};

pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, MemoryPod, ReqwestTransport, TransportError,
    TransportResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
