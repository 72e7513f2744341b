//! Microblog shapes
//!
//! The shapes a simple microblog keeps in a pod: the owner's profile
//! card, channels (containers) and the posts inside them. Channels and
//! posts carry their author as an embedded account under `#author`.

use super::{Shape, ShapeInstance, ShapeResult};
use crate::rdf::{Literal, NamedNode, Vocabulary};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

/// Built-in shapes, built once over a vocabulary
#[derive(Debug, Clone)]
pub struct Catalog {
    user_account: Arc<Shape>,
    creator: Arc<Shape>,
    channel: Arc<Shape>,
    post: Arc<Shape>,
    date_time: NamedNode,
}

impl Catalog {
    pub fn new(vocab: &Vocabulary) -> ShapeResult<Self> {
        let user_account = Shape::builder("user_account")
            .literal("name", vocab.term("foaf:name")?)
            .reference("pic", vocab.term("foaf:img")?)
            .reference("depic", vocab.term("foaf:depiction")?)
            .reference("storage", vocab.term("space:storage")?)
            .build()?;

        let creator = Arc::new(
            Shape::builder("creator")
                .type_term(vocab.term("sioc:UserAccount")?)
                .literal("name", vocab.term("foaf:name")?)
                .reference("webid", vocab.term("sioc:account_of")?)
                .reference("pic", vocab.term("sioc:avatar")?)
                .build()?,
        );

        let channel = Shape::builder("channel")
            .type_term(vocab.term("sioc:Container")?)
            .prefix_hint("post")
            .identity("uri")
            .literal("title", vocab.term("dct:title")?)
            .embedded("owner", vocab.term("sioc:has_creator")?, "author", creator.clone())
            .build()?;

        let post = Shape::builder("post")
            .type_term(vocab.term("sioc:Post")?)
            .identity("uri")
            .literal("date", vocab.term("dct:created")?)
            .embedded("owner", vocab.term("sioc:has_creator")?, "author", creator.clone())
            .literal("body", vocab.term("sioc:content")?)
            .build()?;

        Ok(Self {
            user_account: Arc::new(user_account),
            creator,
            channel: Arc::new(channel),
            post: Arc::new(post),
            date_time: vocab.date_time().clone(),
        })
    }

    /// Profile card, read at the WebID; has no type term
    pub fn user_account(&self) -> &Arc<Shape> {
        &self.user_account
    }

    pub fn creator(&self) -> &Arc<Shape> {
        &self.creator
    }

    pub fn channel(&self) -> &Arc<Shape> {
        &self.channel
    }

    pub fn post(&self) -> &Arc<Shape> {
        &self.post
    }

    pub fn new_channel(&self, title: &str) -> ShapeResult<ShapeInstance> {
        ShapeInstance::new(self.channel.clone()).with("title", title)
    }

    /// A post dated now
    pub fn new_post(&self, body: &str) -> ShapeResult<ShapeInstance> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        ShapeInstance::new(self.post.clone())
            .with("date", Literal::new_typed_literal(now, self.date_time.clone()))?
            .with("body", body)
    }

    /// An author account for [`Catalog::new_channel`] / [`Catalog::new_post`]
    pub fn new_creator(&self, name: &str, webid: &str) -> ShapeResult<ShapeInstance> {
        ShapeInstance::new(self.creator.clone())
            .with("name", name)?
            .with("webid", webid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Graph, RdfObject, RdfSubject};
    use crate::shape::{read, write, InstanceValue};

    #[test]
    fn test_catalog_shapes() {
        let catalog = Catalog::new(&Vocabulary::default()).unwrap();
        assert!(catalog.user_account().type_term().is_none());
        assert_eq!(
            catalog.channel().type_term().unwrap().as_str(),
            "http://rdfs.org/sioc/ns#Container"
        );
        assert_eq!(catalog.channel().prefix_hint(), Some("post"));
        assert_eq!(catalog.post().len(), 4);
    }

    #[test]
    fn test_new_post_is_dated() {
        let vocab = Vocabulary::default();
        let catalog = Catalog::new(&vocab).unwrap();
        let post = catalog.new_post("hello").unwrap();

        match post.get("date") {
            Some(InstanceValue::Term(RdfObject::Literal(date))) => {
                assert_eq!(&date.datatype(), vocab.date_time());
                assert!(chrono::DateTime::parse_from_rfc3339(date.value()).is_ok());
            }
            other => panic!("expected a dateTime literal, got {other:?}"),
        }
    }

    #[test]
    fn test_channel_with_owner_round_trip() {
        let vocab = Vocabulary::default();
        let catalog = Catalog::new(&vocab).unwrap();
        let owner = catalog
            .new_creator("Alice", "https://alice.example/profile/card#me")
            .unwrap();
        let channel = catalog
            .new_channel("Cooking")
            .unwrap()
            .with("owner", owner)
            .unwrap();

        let subject = NamedNode::new("https://alice.example/mb/cooking/.meta").unwrap();
        let mut graph = Graph::new();
        write(&mut graph, &vocab, &subject, &channel).unwrap();

        let resolved = read(&graph, &RdfSubject::from(subject), catalog.channel());
        assert_eq!(resolved.text("title"), Some("Cooking"));
        let owner = resolved.nested("owner").unwrap();
        assert_eq!(
            owner.uri.as_deref(),
            Some("https://alice.example/mb/cooking/.meta#author")
        );
        assert_eq!(
            owner.text("webid"),
            Some("https://alice.example/profile/card#me")
        );
    }
}
