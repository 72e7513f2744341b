//! Pod operations
//!
//! [`PodClient`] runs the multi-request protocols of an LDP pod over an
//! [`HttpTransport`]: reading profiles, containers and resources through
//! shapes, creating containers and resources, writing ACLs and deleting.
//! Each operation uses a fresh graph and holds no state beyond the call.

mod acl;
mod delete;
mod write;

pub use acl::{AclGrant, AclUpdate};
pub use delete::DeleteReport;
pub use write::{CreatedContainer, CreatedResource};

use crate::config::PodConfig;
use crate::error::{PodError, PodResult};
use crate::rdf::{Graph, NamedNode, RdfFormat, RdfParser, RdfSubject, Vocabulary};
use crate::shape::{read, ResolvedResource, Shape, ShapeError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use futures::stream::{self, BoxStream, StreamExt};
use oxiri::Iri;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use std::sync::Arc;
use tracing::debug;

/// Client for one or more pods
#[derive(Clone)]
pub struct PodClient {
    transport: Arc<dyn HttpTransport>,
    config: PodConfig,
    vocab: Arc<Vocabulary>,
}

impl PodClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_config(transport, PodConfig::default())
    }

    pub fn with_config(transport: Arc<dyn HttpTransport>, config: PodConfig) -> Self {
        Self {
            transport,
            config,
            vocab: Arc::new(Vocabulary::default()),
        }
    }

    /// Client over HTTP, configured from `config`
    pub fn connect(config: PodConfig) -> PodResult<Self> {
        let transport = ReqwestTransport::new(&config).map_err(|e| PodError::Transport {
            message: e.to_string(),
            body: String::new(),
        })?;
        Ok(Self::with_config(Arc::new(transport), config))
    }

    pub fn with_vocabulary(mut self, vocab: Vocabulary) -> Self {
        self.vocab = Arc::new(vocab);
        self
    }

    pub fn config(&self) -> &PodConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Send a credentialed request; non-success statuses become errors
    async fn send(&self, request: HttpRequest, context: &str) -> PodResult<HttpResponse> {
        let request = request.with_credentials();
        debug!(method = %request.method, url = %request.url, context, "pod request");
        let response = self
            .transport
            .request(request)
            .await
            .map_err(|e| PodError::Transport {
                message: format!("{context}: {e}"),
                body: String::new(),
            })?;

        if response.is_success() {
            Ok(response)
        } else {
            Err(PodError::from_status(
                response.status,
                context,
                response.body,
            ))
        }
    }

    /// GET a document and parse it, resolving relative IRIs against `uri`
    pub async fn fetch_graph(&self, uri: &str) -> PodResult<Graph> {
        let request = HttpRequest::get(uri).header(
            ACCEPT,
            HeaderValue::from_static(RdfFormat::Turtle.media_type()),
        );
        let response = self.send(request, &format!("Fetching {uri}")).await?;
        let format = response
            .header(CONTENT_TYPE)
            .and_then(RdfFormat::from_media_type)
            .unwrap_or(RdfFormat::Turtle);
        let graph = RdfParser::parse_graph(&response.body, format, Some(uri))?;
        debug!(uri, triples = graph.len(), "fetched graph");
        Ok(graph)
    }

    /// Read the profile card of `webid` through an untyped shape
    pub async fn fetch_profile(&self, webid: &str, shape: &Shape) -> PodResult<ResolvedResource> {
        let subject = NamedNode::new(webid)?;
        let graph = self.fetch_graph(subject.document()).await?;
        Ok(read(&graph, &RdfSubject::from(subject), shape))
    }

    /// Containers of every workspace listed in the `space` document
    ///
    /// Yields one batch per workspace, in completion order. Workspaces are
    /// fetched concurrently, each into its own graph; a failed workspace
    /// yields an error batch without stopping the others.
    pub async fn list_containers<'a>(
        &'a self,
        space: &str,
        shape: &'a Shape,
    ) -> PodResult<BoxStream<'a, PodResult<Vec<ResolvedResource>>>> {
        let class = type_of(shape)?;
        let graph = self.fetch_graph(space).await?;
        let workspaces: Vec<String> = graph
            .subjects_of_type(self.vocab.rdf_type(), &self.vocab.space().clone().into())
            .into_iter()
            .filter(RdfSubject::is_named_node)
            .map(|subject| subject.value().to_string())
            .collect();
        debug!(space, workspaces = workspaces.len(), "listing containers");

        let batches = stream::iter(workspaces)
            .map(move |workspace| async move {
                let listing = format!("{workspace}{}", self.config.container_glob);
                let graph = self.fetch_graph(&listing).await?;
                let batch = self.resolve_typed(&graph, shape, class, None);
                debug!(workspace = %workspace, containers = batch.len(), "container batch");
                Ok(batch)
            })
            .buffer_unordered(self.config.max_concurrent_requests)
            .boxed();
        Ok(batches)
    }

    /// Resources of `shape`'s type inside `container`
    pub async fn list_resources(
        &self,
        container: &str,
        shape: &Shape,
    ) -> PodResult<Vec<ResolvedResource>> {
        let class = type_of(shape)?;
        let listing = format!("{container}{}", self.config.resource_glob);
        let graph = self.fetch_graph(&listing).await?;
        Ok(self.resolve_typed(&graph, shape, class, Some(container)))
    }

    fn resolve_typed(
        &self,
        graph: &Graph,
        shape: &Shape,
        class: &NamedNode,
        container: Option<&str>,
    ) -> Vec<ResolvedResource> {
        graph
            .subjects_of_type(self.vocab.rdf_type(), &class.clone().into())
            .iter()
            .map(|subject| {
                let mut resource = read(graph, subject, shape);
                resource.container_uri = container.map(str::to_string);
                resource
            })
            .collect()
    }
}

fn type_of(shape: &Shape) -> PodResult<&NamedNode> {
    shape
        .type_term()
        .ok_or_else(|| ShapeError::Untyped(shape.name().to_string()).into())
}

/// Resolve a header value such as `Location` against the request URL
fn resolve_href(base: &str, href: &str) -> PodResult<String> {
    let base = Iri::parse(base).map_err(|e| crate::rdf::RdfError::InvalidIri(format!("{base}: {e}")))?;
    let resolved = base
        .resolve(href)
        .map_err(|e| crate::rdf::RdfError::InvalidIri(format!("{href}: {e}")))?;
    Ok(resolved.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_href() {
        assert_eq!(
            resolve_href("https://pod.example/ch/", "/ch/p1").unwrap(),
            "https://pod.example/ch/p1"
        );
        assert_eq!(
            resolve_href("https://pod.example/ch/", "https://other.example/x").unwrap(),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_untyped_shape_cannot_be_listed() {
        let shape = Shape::builder("card").build().unwrap();
        assert!(matches!(
            type_of(&shape),
            Err(PodError::Shape(ShapeError::Untyped(_)))
        ));
    }
}
