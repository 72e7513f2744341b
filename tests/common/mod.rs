//! Shared fixtures for the pod integration tests

#![allow(dead_code)]

use podkit::{Catalog, MemoryPod, PodClient};
use std::sync::Arc;

pub const ROOT: &str = "https://alice.example/";
pub const WEBID: &str = "https://alice.example/profile/card#me";
pub const WORKSPACE: &str = "https://alice.example/microblog/";
pub const SPACES: &str = "https://alice.example/settings/spaces";

pub const PROFILE: &str = r#"
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix space: <http://www.w3.org/ns/pim/space#> .

<#me> foaf:name "Alice" ;
      foaf:img <https://alice.example/alice.png> ;
      space:storage <https://alice.example/> .
"#;

pub struct Fixture {
    pub pod: Arc<MemoryPod>,
    pub client: PodClient,
    pub catalog: Catalog,
}

/// A pod with Alice's profile card and one workspace
pub async fn setup() -> Fixture {
    let pod = Arc::new(MemoryPod::new());
    pod.seed("https://alice.example/profile/card", PROFILE)
        .await
        .unwrap();
    pod.add_container(WORKSPACE).await;
    pod.seed(
        SPACES,
        &format!("<{WORKSPACE}> a <http://rdfs.org/sioc/ns#Space> ."),
    )
    .await
    .unwrap();

    let client = PodClient::new(pod.clone());
    let catalog = Catalog::new(client.vocabulary()).unwrap();
    Fixture {
        pod,
        client,
        catalog,
    }
}
