//! Resource and container deletion

use super::PodClient;
use crate::error::{PodError, PodResult};
use crate::link::{parse_link_header, Links};
use crate::transport::{HttpRequest, HttpResponse};
use futures::stream::{self, StreamExt};
use reqwest::header::LINK;
use serde::Serialize;
use tracing::{info, warn};

/// Every URI removed by a delete operation, in deletion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
}

impl PodClient {
    /// Delete a resource, then the ACL its DELETE response links to
    pub async fn delete_resource(&self, uri: &str) -> PodResult<DeleteReport> {
        let response = self
            .send(HttpRequest::delete(uri), &format!("Deleting {uri}"))
            .await?;
        let acl_uri = links_of(&response, uri)?.resolve("acl", uri)?;
        self.send(HttpRequest::delete(acl_uri.as_str()), &format!("Deleting {acl_uri}"))
            .await?;

        info!(uri, acl = %acl_uri, "deleted resource");
        Ok(DeleteReport {
            deleted: vec![uri.to_string(), acl_uri],
        })
    }

    /// Delete every member of a container, then the container with its
    /// ACL and metadata
    ///
    /// Members are deleted as one concurrent group. If any member delete
    /// fails the container is left in place and every failure is returned
    /// in [`PodError::Incomplete`].
    pub async fn delete_container(&self, uri: &str) -> PodResult<DeleteReport> {
        let listing = self.fetch_graph(uri).await?;
        let members: Vec<String> = listing
            .subjects_of_type(self.vocab.rdf_type(), &self.vocab.resource().clone().into())
            .into_iter()
            .map(|subject| subject.value().to_string())
            .filter(|member| member != uri)
            .collect();

        let mut report = DeleteReport::default();
        report
            .deleted
            .extend(self.delete_group(members, "member").await?);

        let head = self
            .send(HttpRequest::head(uri), &format!("Reading links of {uri}"))
            .await?;
        let links = links_of(&head, uri)?;
        let acl_uri = links.resolve("acl", uri)?;
        let meta_uri = links.resolve("meta", uri)?;

        self.send(HttpRequest::delete(uri), &format!("Deleting {uri}"))
            .await?;
        report.deleted.push(uri.to_string());

        report
            .deleted
            .extend(self.delete_group(vec![acl_uri, meta_uri], "companion").await?);

        info!(uri, deleted = report.deleted.len(), "deleted container");
        Ok(report)
    }

    /// DELETE all `uris` concurrently; succeeds only if every one does
    async fn delete_group(&self, uris: Vec<String>, kind: &str) -> PodResult<Vec<String>> {
        let outcomes: Vec<PodResult<HttpResponse>> = stream::iter(&uris)
            .map(|target| async move {
                self.send(HttpRequest::delete(target.as_str()), &format!("Deleting {target}"))
                    .await
            })
            .buffer_unordered(self.config.max_concurrent_requests)
            .collect()
            .await;

        let failures: Vec<PodError> = outcomes.into_iter().filter_map(Result::err).collect();
        if !failures.is_empty() {
            warn!(kind, failed = failures.len(), total = uris.len(), "delete group incomplete");
            return Err(PodError::Incomplete { failures });
        }
        Ok(uris)
    }
}

fn links_of(response: &HttpResponse, uri: &str) -> PodResult<Links> {
    let header = response.header(LINK).ok_or_else(|| PodError::MissingHeader {
        header: "Link",
        url: uri.to_string(),
    })?;
    Ok(parse_link_header(header)?)
}
