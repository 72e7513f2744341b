//! Access control documents

use super::write::turtle;
use super::PodClient;
use crate::error::{PodError, PodResult};
use crate::link::parse_link_header;
use crate::rdf::{Graph, NamedNode, RdfFormat, RdfSerializer};
use crate::transport::HttpRequest;
use reqwest::header::{CONTENT_TYPE, LINK};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Access granted beyond the owner's read/write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGrant {
    /// Mode names, any casing: `read`, `Write`, `APPEND`
    pub modes: Vec<String>,
    /// WebIDs granted the modes; empty means everyone
    pub agents: Vec<String>,
}

impl AclGrant {
    pub fn public<S: Into<String>>(modes: impl IntoIterator<Item = S>) -> Self {
        Self {
            modes: modes.into_iter().map(Into::into).collect(),
            agents: Vec::new(),
        }
    }

    pub fn agents<S: Into<String>, A: Into<String>>(
        modes: impl IntoIterator<Item = S>,
        agents: impl IntoIterator<Item = A>,
    ) -> Self {
        Self {
            modes: modes.into_iter().map(Into::into).collect(),
            agents: agents.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of [`PodClient::set_acl`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclUpdate {
    pub acl_uri: String,
    pub meta_uri: Option<String>,
}

impl PodClient {
    /// Replace the ACL of `uri`
    ///
    /// The owner always gets Read and Write on the resource, its ACL and
    /// its metadata document when the server advertises one. A grant with
    /// modes adds a second authorization for its agents, or for the public
    /// agent class when it names none.
    pub async fn set_acl(
        &self,
        uri: &str,
        owner: &str,
        grant: Option<&AclGrant>,
    ) -> PodResult<AclUpdate> {
        let response = self.send(HttpRequest::head(uri), "Reading ACL location").await?;
        let header = response.header(LINK).ok_or_else(|| PodError::MissingHeader {
            header: "Link",
            url: uri.to_string(),
        })?;
        let links = parse_link_header(header)?;
        let acl_uri = links.resolve("acl", uri)?;
        let meta_uri = links.get("meta").map(|link| link.resolve(uri)).transpose()?;

        let graph = self.acl_graph(uri, owner, meta_uri.as_deref(), grant)?;
        let body = RdfSerializer::serialize_graph(&graph, RdfFormat::Turtle)?;
        let request = HttpRequest::put(acl_uri.as_str(), body).header(CONTENT_TYPE, turtle());
        self.send(request, "Writing ACL").await?;

        info!(uri, acl = %acl_uri, public = grant.is_some_and(|g| g.agents.is_empty()), "ACL written");
        Ok(AclUpdate { acl_uri, meta_uri })
    }

    /// The authorization graph, written relative to the ACL document
    pub(crate) fn acl_graph(
        &self,
        uri: &str,
        owner: &str,
        meta_uri: Option<&str>,
        grant: Option<&AclGrant>,
    ) -> PodResult<Graph> {
        let vocab = &self.vocab;
        let read = vocab.access_mode("Read")?;
        let write = vocab.access_mode("Write")?;
        let target = NamedNode::new(uri)?;

        let mut graph = Graph::new();
        let owner_auth = NamedNode::relative("");
        graph.add(owner_auth.clone(), vocab.rdf_type().clone(), vocab.authorization().clone());
        graph.add(owner_auth.clone(), vocab.access_to().clone(), NamedNode::relative(""));
        graph.add(owner_auth.clone(), vocab.access_to().clone(), target.clone());
        if let Some(meta) = meta_uri {
            graph.add(owner_auth.clone(), vocab.access_to().clone(), NamedNode::new(meta)?);
        }
        graph.add(owner_auth.clone(), vocab.agent().clone(), NamedNode::new(owner)?);
        graph.add(owner_auth.clone(), vocab.mode().clone(), read);
        graph.add(owner_auth, vocab.mode().clone(), write);

        let Some(grant) = grant.filter(|g| g.modes.iter().any(|m| !m.trim().is_empty())) else {
            return Ok(graph);
        };

        let shared = NamedNode::relative(format!("#{}", basename(uri)));
        graph.add(shared.clone(), vocab.rdf_type().clone(), vocab.authorization().clone());
        graph.add(shared.clone(), vocab.access_to().clone(), target);
        if grant.agents.is_empty() {
            graph.add(shared.clone(), vocab.agent_class().clone(), vocab.public_agent().clone());
        } else {
            for agent in &grant.agents {
                graph.add(shared.clone(), vocab.agent().clone(), NamedNode::new(agent)?);
            }
        }
        for mode in grant.modes.iter().filter(|m| !m.trim().is_empty()) {
            let term = vocab.access_mode(&mode_name(mode))?;
            graph.add(shared.clone(), vocab.mode().clone(), term);
        }
        Ok(graph)
    }
}

/// `read` / `READ` -> `Read`
fn mode_name(mode: &str) -> String {
    let mut chars = mode.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Last non-empty path segment, used to name the shared authorization
fn basename(uri: &str) -> &str {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("shared")
}
