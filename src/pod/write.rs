use super::{resolve_href, PodClient};
use crate::error::{PodError, PodResult};
use crate::link::{parse_link_header, Link, Links};
use crate::rdf::{Graph, Literal, NamedNode, RdfFormat, RdfSerializer};
use crate::shape::{write, ShapeInstance};
use crate::transport::{HttpRequest, HttpResponse};
use reqwest::header::{HeaderValue, CONTENT_TYPE, LINK, LOCATION};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of [`PodClient::create_resource`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedResource {
    pub resource_uri: String,
}

/// Outcome of [`PodClient::create_container`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedContainer {
    pub container_uri: String,
    pub meta_uri: String,
    pub acl_uri: String,
    /// False when the shape produced no metadata and nothing was posted
    pub metadata_written: bool,
}

impl PodClient {
    /// Upload `instance` as a new resource in `container`
    ///
    /// The document is written against the relative subject `<>`, so the
    /// server resolves it to the URI it assigns.
    pub async fn create_resource(
        &self,
        container: &str,
        instance: &ShapeInstance,
    ) -> PodResult<CreatedResource> {
        let mut graph = Graph::new();
        write(&mut graph, &self.vocab, &NamedNode::relative(""), instance)?;
        let body = RdfSerializer::serialize_graph(&graph, RdfFormat::Turtle)?;

        let request = HttpRequest::post(container, body).header(CONTENT_TYPE, turtle());
        let response = self.send(request, "Creating resource").await?;
        let resource_uri = location(&response, container)?;

        info!(container, resource = %resource_uri, "created resource");
        Ok(CreatedResource { resource_uri })
    }

    /// Create a container in `space` and post its metadata
    ///
    /// There is no rollback: if the metadata POST fails the container
    /// stays, without metadata.
    pub async fn create_container(
        &self,
        space: &str,
        instance: &ShapeInstance,
    ) -> PodResult<CreatedContainer> {
        let container_type: Links = [Link::new(self.vocab.basic_container().as_str(), "type")]
            .into_iter()
            .collect();
        let request = HttpRequest::post(space, "")
            .header(CONTENT_TYPE, turtle())
            .try_header(LINK, &container_type.to_string())
            .map_err(|e| PodError::Transport {
                message: format!("Creating container: {e}"),
                body: String::new(),
            })?;
        let response = self.send(request, "Creating container").await?;

        let container_uri = location(&response, space)?;
        let header = response.header(LINK).ok_or_else(|| PodError::MissingHeader {
            header: "Link",
            url: space.to_string(),
        })?;
        let links = parse_link_header(header)?;
        let meta_uri = links.resolve("meta", &container_uri)?;
        let acl_uri = links.resolve("acl", &container_uri)?;

        let subject = NamedNode::new(&container_uri)?;
        let mut graph = Graph::new();
        if let Some(hint) = instance.shape().prefix_hint() {
            graph.add(
                subject.clone(),
                self.vocab.uri_prefix().clone(),
                Literal::new_simple_literal(hint),
            );
        }
        write(&mut graph, &self.vocab, &subject, instance)?;

        let metadata_written = if graph.is_empty() {
            debug!(container = %container_uri, "no metadata to write");
            false
        } else {
            let body = RdfSerializer::serialize_graph(&graph, RdfFormat::Turtle)?;
            let request = HttpRequest::post(meta_uri.as_str(), body).header(CONTENT_TYPE, turtle());
            self.send(request, "Writing container metadata").await?;
            true
        };

        info!(space, container = %container_uri, "created container");
        Ok(CreatedContainer {
            container_uri,
            meta_uri,
            acl_uri,
            metadata_written,
        })
    }
}

pub(super) fn turtle() -> HeaderValue {
    HeaderValue::from_static(RdfFormat::Turtle.media_type())
}

fn location(response: &HttpResponse, request_url: &str) -> PodResult<String> {
    let href = response
        .header(LOCATION)
        .ok_or_else(|| PodError::MissingHeader {
            header: "Location",
            url: request_url.to_string(),
        })?;
    resolve_href(request_url, href)
}
