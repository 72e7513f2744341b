//! reqwest transport

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError, TransportResult};
use crate::config::{PodConfig, PROXY_PLACEHOLDER};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method};
use tracing::debug;

// encodeURIComponent's unreserved set
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Transport for real pods over HTTP
///
/// Every request carries the configured timeout. GET requests go through
/// the proxy template when one is set. The bearer token is attached only
/// to credentialed requests sent straight to the pod, never to the proxy.
pub struct ReqwestTransport {
    client: Client,
    proxy_template: Option<String>,
    auth_token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(config: &PodConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Self {
            client,
            proxy_template: config.proxy_template.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// The URL actually contacted for `request`
    pub fn target_url(&self, request: &HttpRequest) -> String {
        match self.proxy_for(request) {
            Some(template) => {
                let encoded = utf8_percent_encode(&request.url, COMPONENT).to_string();
                template.replace(PROXY_PLACEHOLDER, &encoded)
            }
            None => request.url.clone(),
        }
    }

    fn proxy_for(&self, request: &HttpRequest) -> Option<&str> {
        self.proxy_template
            .as_deref()
            .filter(|_| request.method == Method::GET)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let target = self.target_url(&request);
        let send_token = request.with_credentials && self.proxy_for(&request).is_none();
        debug!(method = %request.method, url = %request.url, target = %target, "HTTP request");

        let mut builder = self
            .client
            .request(request.method.clone(), &target)
            .headers(request.headers);
        if let Some(token) = self.auth_token.as_ref().filter(|_| send_token) {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let failed = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: request.url.clone(),
                }
            } else {
                TransportError::Network {
                    url: request.url.clone(),
                    message: e.to_string(),
                }
            }
        };

        let response = builder.send().await.map_err(failed)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(failed)?;
        debug!(url = %request.url, status = status.as_u16(), "HTTP response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_applies_to_get_only() {
        let config = PodConfig {
            proxy_template: Some("https://proxy.example/proxy?uri={uri}".into()),
            ..Default::default()
        };
        let transport = ReqwestTransport::new(&config).unwrap();

        let get = HttpRequest::get("https://pod.example/a b?x=1");
        assert_eq!(
            transport.target_url(&get),
            "https://proxy.example/proxy?uri=https%3A%2F%2Fpod.example%2Fa%20b%3Fx%3D1"
        );

        let put = HttpRequest::put("https://pod.example/a", "");
        assert_eq!(transport.target_url(&put), "https://pod.example/a");
    }

    #[test]
    fn test_no_proxy() {
        let transport = ReqwestTransport::new(&PodConfig::default()).unwrap();
        let get = HttpRequest::get("https://pod.example/a");
        assert_eq!(transport.target_url(&get), "https://pod.example/a");
    }
}
