//! In-process pod
//!
//! `MemoryPod` answers [`HttpRequest`]s the way an LDP server does, over
//! documents held in memory. Containers are URIs ending in `/`; every
//! container has `.acl` and `.meta` companions and every resource has a
//! `<resource>.acl`, all advertised through `Link` headers.
//!
//! Listings:
//! - `GET <container>` returns its own triples plus every member typed
//!   `rdfs:Resource` and linked with `ldp:contains`
//! - `GET <container>*` merges the member resources
//! - `GET <container>.*` merges the `.meta` documents of child containers

use super::{HttpRequest, HttpResponse, HttpTransport, TransportResult};
use crate::link::{parse_link_header, Link, Links};
use crate::rdf::{Graph, NamedNode, ParseResult, RdfFormat, RdfParser, RdfSerializer, Vocabulary};
use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LINK, LOCATION};
use reqwest::{Method, StatusCode};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

const ACL_SUFFIX: &str = ".acl";
const META_SUFFIX: &str = ".meta";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Container,
    Resource,
    Companion,
}

#[derive(Debug, Clone)]
struct Document {
    kind: Kind,
    graph: Graph,
}

/// A request as received by the pod
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

#[derive(Debug, Default)]
struct PodState {
    documents: IndexMap<String, Document>,
    requests: Vec<RecordedRequest>,
    overrides: HashMap<String, StatusCode>,
}

/// In-memory LDP pod implementing [`HttpTransport`]
pub struct MemoryPod {
    vocab: Vocabulary,
    state: Mutex<PodState>,
}

impl Default for MemoryPod {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPod {
    pub fn new() -> Self {
        Self {
            vocab: Vocabulary::default(),
            state: Mutex::new(PodState::default()),
        }
    }

    /// Create a container (and its companions) if it does not exist
    pub async fn add_container(&self, uri: &str) {
        let uri = container_uri(uri);
        let mut state = self.state.lock().await;
        insert_container(&mut state, &uri);
    }

    /// Merge Turtle into a document, resolving relative IRIs against `uri`
    pub async fn seed(&self, uri: &str, turtle: &str) -> ParseResult<()> {
        let graph = RdfParser::parse_graph(turtle, RdfFormat::Turtle, Some(uri))?;
        let mut state = self.state.lock().await;
        if uri.ends_with('/') {
            insert_container(&mut state, uri);
        }
        let document = state
            .documents
            .entry(uri.to_string())
            .or_insert_with(|| Document {
                kind: kind_of(uri),
                graph: Graph::new(),
            });
        document.graph.extend(graph.iter().cloned());
        Ok(())
    }

    /// Copy of a stored document
    pub async fn document(&self, uri: &str) -> Option<Graph> {
        let state = self.state.lock().await;
        state.documents.get(uri).map(|d| d.graph.clone())
    }

    pub async fn contains(&self, uri: &str) -> bool {
        self.state.lock().await.documents.contains_key(uri)
    }

    /// Every request received so far, in arrival order
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    pub async fn clear_requests(&self) {
        self.state.lock().await.requests.clear();
    }

    /// Answer every request for `uri` with `status` until cleared
    pub async fn set_status_override(&self, uri: &str, status: StatusCode) {
        self.state
            .lock()
            .await
            .overrides
            .insert(uri.to_string(), status);
    }

    pub async fn clear_status_override(&self, uri: &str) {
        self.state.lock().await.overrides.remove(uri);
    }

    fn get(&self, state: &PodState, url: &str) -> HttpResponse {
        if let Some(dir) = url.strip_suffix(".*") {
            if !is_container(state, dir) {
                return respond(StatusCode::NOT_FOUND, "");
            }
            let mut graph = Graph::new();
            for (uri, document) in &state.documents {
                if document.kind == Kind::Container && parent_of(uri) == Some(dir) {
                    if let Some(meta) = state.documents.get(&format!("{uri}{META_SUFFIX}")) {
                        graph.extend(meta.graph.iter().cloned());
                    }
                }
            }
            return turtle_response(&graph);
        }

        if let Some(dir) = url.strip_suffix('*') {
            if !is_container(state, dir) {
                return respond(StatusCode::NOT_FOUND, "");
            }
            let mut graph = Graph::new();
            for (uri, document) in &state.documents {
                if document.kind == Kind::Resource && parent_of(uri) == Some(dir) {
                    graph.extend(document.graph.iter().cloned());
                }
            }
            return turtle_response(&graph);
        }

        let Some(document) = state.documents.get(url) else {
            return respond(StatusCode::NOT_FOUND, "");
        };
        let mut graph = document.graph.clone();
        if document.kind == Kind::Container {
            let container = match NamedNode::new(url) {
                Ok(node) => node,
                Err(e) => return respond(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
            };
            graph.add(
                container.clone(),
                self.vocab.rdf_type().clone(),
                self.vocab.basic_container().clone(),
            );
            for member in members(state, url)
                .into_iter()
                .filter_map(|m| NamedNode::new(m).ok())
            {
                graph.add(
                    member.clone(),
                    self.vocab.rdf_type().clone(),
                    self.vocab.resource().clone(),
                );
                graph.add(container.clone(), self.vocab.contains().clone(), member);
            }
        }
        with_links(turtle_response(&graph), url)
    }

    fn post(&self, state: &mut PodState, request: &HttpRequest) -> HttpResponse {
        let url = request.url.as_str();
        let Some(target) = state.documents.get(url) else {
            return respond(StatusCode::NOT_FOUND, "");
        };

        if target.kind != Kind::Container {
            let graph = match parse_body(request, url) {
                Ok(graph) => graph,
                Err(response) => return response,
            };
            if let Some(document) = state.documents.get_mut(url) {
                document.graph.extend(graph.iter().cloned());
            }
            return with_links(respond(StatusCode::OK, ""), url);
        }

        let id = Uuid::new_v4().simple().to_string();
        let created = if self.announces_container(request) {
            let uri = format!("{url}{id}/");
            insert_container(state, &uri);
            uri
        } else {
            let uri = format!("{url}{id}");
            let graph = match parse_body(request, &uri) {
                Ok(graph) => graph,
                Err(response) => return response,
            };
            state.documents.insert(
                uri.clone(),
                Document {
                    kind: Kind::Resource,
                    graph,
                },
            );
            state.documents.insert(
                format!("{uri}{ACL_SUFFIX}"),
                Document {
                    kind: Kind::Companion,
                    graph: Graph::new(),
                },
            );
            uri
        };
        debug!(parent = url, created = %created, "memory pod created document");

        let mut response = with_links(respond(StatusCode::CREATED, ""), &created);
        if let Ok(location) = HeaderValue::from_str(&created) {
            response.headers.insert(LOCATION, location);
        }
        response
    }

    fn put(&self, state: &mut PodState, request: &HttpRequest) -> HttpResponse {
        let url = request.url.as_str();
        let graph = match parse_body(request, url) {
            Ok(graph) => graph,
            Err(response) => return response,
        };
        let status = match state.documents.get_mut(url) {
            Some(document) => {
                document.graph = graph;
                StatusCode::OK
            }
            None => {
                if parent_of(url).map_or(true, |dir| !is_container(state, dir)) {
                    return respond(StatusCode::NOT_FOUND, "");
                }
                state.documents.insert(
                    url.to_string(),
                    Document {
                        kind: kind_of(url),
                        graph,
                    },
                );
                StatusCode::CREATED
            }
        };
        with_links(respond(status, ""), url)
    }

    fn delete(&self, state: &mut PodState, url: &str) -> HttpResponse {
        let Some(document) = state.documents.get(url) else {
            return respond(StatusCode::NOT_FOUND, "");
        };
        if document.kind == Kind::Container && !members(state, url).is_empty() {
            return respond(StatusCode::CONFLICT, "Container is not empty");
        }
        state.documents.shift_remove(url);
        with_links(respond(StatusCode::OK, ""), url)
    }

    fn announces_container(&self, request: &HttpRequest) -> bool {
        request
            .headers
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| parse_link_header(value).ok())
            .any(|links| {
                links
                    .get("type")
                    .is_some_and(|link| link.href == self.vocab.basic_container().as_str())
            })
    }
}

#[async_trait]
impl HttpTransport for MemoryPod {
    async fn request(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let mut state = self.state.lock().await;
        state.requests.push(RecordedRequest {
            method: request.method.clone(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        if let Some(status) = state.overrides.get(&request.url) {
            return Ok(respond(*status, "status override"));
        }

        let response = match request.method {
            Method::GET => self.get(&state, &request.url),
            Method::HEAD => match state.documents.get(&request.url) {
                Some(_) => with_links(respond(StatusCode::OK, ""), &request.url),
                None => respond(StatusCode::NOT_FOUND, ""),
            },
            Method::POST => self.post(&mut state, &request),
            Method::PUT => self.put(&mut state, &request),
            Method::DELETE => self.delete(&mut state, &request.url),
            _ => respond(StatusCode::METHOD_NOT_ALLOWED, ""),
        };
        Ok(response)
    }
}

fn container_uri(uri: &str) -> String {
    if uri.ends_with('/') {
        uri.to_string()
    } else {
        format!("{uri}/")
    }
}

fn kind_of(uri: &str) -> Kind {
    if uri.ends_with('/') {
        Kind::Container
    } else if uri.ends_with(ACL_SUFFIX) || uri.ends_with(META_SUFFIX) {
        Kind::Companion
    } else {
        Kind::Resource
    }
}

fn insert_container(state: &mut PodState, uri: &str) {
    if state.documents.contains_key(uri) {
        return;
    }
    state.documents.insert(
        uri.to_string(),
        Document {
            kind: Kind::Container,
            graph: Graph::new(),
        },
    );
    for suffix in [ACL_SUFFIX, META_SUFFIX] {
        state.documents.insert(
            format!("{uri}{suffix}"),
            Document {
                kind: Kind::Companion,
                graph: Graph::new(),
            },
        );
    }
}

fn is_container(state: &PodState, uri: &str) -> bool {
    state
        .documents
        .get(uri)
        .is_some_and(|d| d.kind == Kind::Container)
}

/// The container a URI sits in
fn parent_of(uri: &str) -> Option<&str> {
    let trimmed = uri.strip_suffix('/').unwrap_or(uri);
    let cut = trimmed.rfind('/')?;
    let parent = &uri[..=cut];
    // never above the authority
    (parent.matches('/').count() >= 3).then_some(parent)
}

fn members<'a>(state: &'a PodState, container: &str) -> Vec<&'a str> {
    state
        .documents
        .iter()
        .filter(|(uri, d)| d.kind != Kind::Companion && parent_of(uri) == Some(container))
        .map(|(uri, _)| uri.as_str())
        .collect()
}

fn companions(uri: &str) -> Links {
    // relative hrefs, resolved by the client against the request URL
    let name = if uri.ends_with('/') {
        ""
    } else {
        uri.rsplit('/').next().unwrap_or_default()
    };
    [
        Link::new(format!("{name}{ACL_SUFFIX}"), "acl"),
        Link::new(format!("{name}{META_SUFFIX}"), "meta"),
    ]
    .into_iter()
    .collect()
}

fn with_links(mut response: HttpResponse, uri: &str) -> HttpResponse {
    if kind_of(uri) == Kind::Companion {
        return response;
    }
    if let Ok(value) = HeaderValue::from_str(&companions(uri).to_string()) {
        response.headers.insert(LINK, value);
    }
    response
}

fn respond(status: StatusCode, body: &str) -> HttpResponse {
    let mut response = HttpResponse::new(status);
    response.body = body.to_string();
    response
}

fn turtle_response(graph: &Graph) -> HttpResponse {
    match RdfSerializer::serialize_graph(graph, RdfFormat::Turtle) {
        Ok(body) => {
            let mut response = respond(StatusCode::OK, &body);
            response.headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(RdfFormat::Turtle.media_type()),
            );
            response
        }
        Err(e) => respond(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn parse_body(request: &HttpRequest, base: &str) -> Result<Graph, HttpResponse> {
    let format = match request.headers.get(CONTENT_TYPE) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(RdfFormat::from_media_type)
            .ok_or_else(|| respond(StatusCode::UNSUPPORTED_MEDIA_TYPE, ""))?,
        None => RdfFormat::Turtle,
    };
    let body = request.body.as_deref().unwrap_or_default();
    RdfParser::parse_graph(body, format, Some(base))
        .map_err(|e| respond(StatusCode::BAD_REQUEST, &e.to_string()))
}
