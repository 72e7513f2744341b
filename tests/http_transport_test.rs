//! ReqwestTransport and PodClient against a mock HTTP server

use podkit::{
    Catalog, HttpRequest, HttpTransport, LinkError, PodClient, PodConfig, PodError,
    ReqwestTransport, TransportError,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_with_token() -> PodConfig {
    PodConfig {
        auth_token: Some("secret".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_bearer_token_only_on_credentialed_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/card"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&config_with_token()).unwrap();
    let url = format!("{}/card", server.uri());
    transport.request(HttpRequest::get(&url)).await.unwrap();
    transport
        .request(HttpRequest::get(&url).with_credentials())
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert!(received[0].headers.get("authorization").is_none());
    assert_eq!(
        received[1].headers.get("authorization").unwrap(),
        "Bearer secret"
    );
}

#[tokio::test]
async fn test_status_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&PodConfig::default()).unwrap();
    let response = transport
        .request(HttpRequest::get(server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, "no");
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = PodConfig {
        timeout_secs: 1,
        ..Default::default()
    };
    let transport = ReqwestTransport::new(&config).unwrap();
    let err = transport
        .request(HttpRequest::get(server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout { .. }), "{err:?}");
}

#[tokio::test]
async fn test_proxy_receives_encoded_target_without_token() {
    let server = MockServer::start().await;
    let target = "https://alice.example/profile/card";
    Mock::given(method("GET"))
        .and(path("/proxy"))
        .and(query_param("uri", target))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = PodConfig {
        proxy_template: Some(format!("{}/proxy?uri={{uri}}", server.uri())),
        ..config_with_token()
    };
    let transport = ReqwestTransport::new(&config).unwrap();
    let response = transport
        .request(HttpRequest::get(target).with_credentials())
        .await
        .unwrap();
    assert!(response.is_success());

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_fetch_graph_resolves_against_request_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile/card"))
        .and(header("accept", "text/turtle"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    r#"<#me> <http://xmlns.com/foaf/0.1/name> "Alice" ."#,
                    "text/turtle; charset=utf-8",
                ),
        )
        .mount(&server)
        .await;

    let client = PodClient::connect(PodConfig::default()).unwrap();
    let url = format!("{}/profile/card", server.uri());
    let graph = client.fetch_graph(&url).await.unwrap();

    assert_eq!(graph.len(), 1);
    let triple = graph.iter().next().unwrap();
    assert_eq!(triple.subject.value(), format!("{url}#me"));
}

#[tokio::test]
async fn test_create_resource_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mb/ch1/"))
        .and(header("content-type", "text/turtle"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(201).insert_header("location", "/mb/ch1/p1"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = Arc::new(ReqwestTransport::new(&config_with_token()).unwrap());
    let client = PodClient::with_config(transport, config_with_token());
    let catalog = Catalog::new(client.vocabulary()).unwrap();

    let container = format!("{}/mb/ch1/", server.uri());
    let created = client
        .create_resource(&container, &catalog.new_post("over the wire").unwrap())
        .await
        .unwrap();
    assert_eq!(created.resource_uri, format!("{}/mb/ch1/p1", server.uri()));
}

#[tokio::test]
async fn test_create_container_sends_type_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mb/"))
        .and(header(
            "link",
            "<http://www.w3.org/ns/ldp#BasicContainer>; rel=\"type\"",
        ))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("location", "/mb/ch1/")
                .insert_header("link", "<.acl>; rel=\"acl\", <.meta>; rel=\"meta\""),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mb/ch1/.meta"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = PodClient::connect(PodConfig::default()).unwrap();
    let catalog = Catalog::new(client.vocabulary()).unwrap();
    let created = client
        .create_container(
            &format!("{}/mb/", server.uri()),
            &catalog.new_channel("Cooking").unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(created.container_uri, format!("{}/mb/ch1/", server.uri()));
    assert_eq!(created.meta_uri, format!("{}/mb/ch1/.meta", server.uri()));
    assert_eq!(created.acl_uri, format!("{}/mb/ch1/.acl", server.uri()));

    let received = server.received_requests().await.unwrap();
    let meta = received
        .iter()
        .find(|r| r.url.path() == "/mb/ch1/.meta")
        .unwrap();
    assert_eq!(meta.headers.get(CONTENT_TYPE).unwrap(), "text/turtle");
    let body = String::from_utf8_lossy(&meta.body);
    assert!(body.contains("Cooking"));
}

#[tokio::test]
async fn test_fetch_profile_from_rdfxml_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile/card"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:foaf="http://xmlns.com/foaf/0.1/">
  <rdf:Description rdf:about="#me">
    <foaf:name>Alice</foaf:name>
    <foaf:img rdf:resource="/alice.png"/>
  </rdf:Description>
</rdf:RDF>"##,
                    "application/rdf+xml",
                ),
        )
        .mount(&server)
        .await;

    let client = PodClient::connect(PodConfig::default()).unwrap();
    let catalog = Catalog::new(client.vocabulary()).unwrap();
    let webid = format!("{}/profile/card#me", server.uri());
    let profile = client
        .fetch_profile(&webid, catalog.user_account())
        .await
        .unwrap();

    assert_eq!(profile.uri.as_deref(), Some(webid.as_str()));
    assert_eq!(profile.text("name"), Some("Alice"));
    let pic = format!("{}/alice.png", server.uri());
    assert_eq!(profile.text("pic"), Some(pic.as_str()));
}

#[tokio::test]
async fn test_set_acl_requires_acl_relation() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/mb/ch1/"))
        .respond_with(ResponseTemplate::new(200).insert_header("link", "<.meta>; rel=\"meta\""))
        .mount(&server)
        .await;

    let client = PodClient::connect(PodConfig::default()).unwrap();
    let err = client
        .set_acl(
            &format!("{}/mb/ch1/", server.uri()),
            "https://alice.example/profile/card#me",
            None,
        )
        .await
        .unwrap_err();

    match err {
        PodError::MalformedHeader(LinkError::MissingRelation(rel)) => assert_eq!(rel, "acl"),
        other => panic!("expected a missing acl relation, got {other:?}"),
    }
    let received = server.received_requests().await.unwrap();
    assert!(received.iter().all(|r| r.method.as_str() != "PUT"));
}

#[tokio::test]
async fn test_delete_resource_requires_acl_relation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/mb/ch1/p1"))
        .respond_with(ResponseTemplate::new(200).insert_header("link", "<p1.meta>; rel=\"meta\""))
        .expect(1)
        .mount(&server)
        .await;

    let client = PodClient::connect(PodConfig::default()).unwrap();
    let err = client
        .delete_resource(&format!("{}/mb/ch1/p1", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PodError::MalformedHeader(LinkError::MissingRelation(_))
    ));
}

#[tokio::test]
async fn test_create_container_requires_meta_relation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mb/"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("location", "/mb/ch1/")
                .insert_header("link", "<.acl>; rel=\"acl\""),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PodClient::connect(PodConfig::default()).unwrap();
    let catalog = Catalog::new(client.vocabulary()).unwrap();
    let err = client
        .create_container(
            &format!("{}/mb/", server.uri()),
            &catalog.new_channel("Cooking").unwrap(),
        )
        .await
        .unwrap_err();
    match err {
        PodError::MalformedHeader(LinkError::MissingRelation(rel)) => assert_eq!(rel, "meta"),
        other => panic!("expected a missing meta relation, got {other:?}"),
    }
}
