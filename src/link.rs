//! HTTP `Link` header parsing
//!
//! Pods advertise the companion documents of a resource (its ACL and its
//! metadata) through the `Link` header:
//!
//! ```text
//! Link: <https://pod.example/ch/.acl>; rel="acl", <https://pod.example/ch/.meta>; rel="meta"
//! ```
//!
//! [`parse_link_header`] indexes those segments by relation. Segments that
//! carry no `rel` parameter are dropped, and a relation seen twice keeps
//! the last segment.

use indexmap::IndexMap;
use oxiri::Iri;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Link header errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The header contains no `<uri>; ...` segment at all
    #[error("Malformed Link header: {0:?}")]
    Malformed(String),

    /// A relation the caller depends on is not advertised
    #[error("Link header has no rel=\"{0}\"")]
    MissingRelation(String),

    /// The advertised href cannot be resolved to an absolute IRI
    #[error("Invalid link target {href}: {reason}")]
    InvalidHref { href: String, reason: String },

    /// The header grammar failed to compile
    #[error("Link grammar error: {0}")]
    Grammar(String),
}

pub type LinkResult<T> = Result<T, LinkError>;

// RFC 7230 token; quoted values may hold commas, semicolons and `=`.
const TOKEN: &str = r#"[^()<>@,;:"/\[\]?={} \t]+"#;
const VALUE: &str = r#""(?:[^"\\]|\\.)*"|[^",;\s]*"#;

static SEGMENT: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"<([^>]*)>((?:\s*;\s*{TOKEN}\s*=\s*(?:{VALUE}))*)"#
    ))
});

static PARAM: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(&format!(r#";\s*({TOKEN})\s*=\s*({VALUE})"#)));

fn grammar(re: &'static LazyLock<Result<Regex, regex::Error>>) -> LinkResult<&'static Regex> {
    re.as_ref().map_err(|e| LinkError::Grammar(e.to_string()))
}

/// One link target with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target URI, verbatim from the header
    pub href: String,
    /// Parameters in header order; names are lowercased, values unquoted
    pub params: IndexMap<String, String>,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        let mut params = IndexMap::new();
        params.insert("rel".to_string(), rel.into());
        Self {
            href: href.into(),
            params,
        }
    }

    /// Add or replace a parameter
    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// The relation type; links without one are never stored
    pub fn rel(&self) -> &str {
        self.params.get("rel").map(String::as_str).unwrap_or_default()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The href resolved against the URL of the response it came from
    pub fn resolve(&self, base: &str) -> LinkResult<String> {
        let invalid = |reason: String| LinkError::InvalidHref {
            href: self.href.clone(),
            reason,
        };
        let base = Iri::parse(base).map_err(|e| invalid(format!("base {base}: {e}")))?;
        let resolved = base.resolve(&self.href).map_err(|e| invalid(e.to_string()))?;
        Ok(resolved.into_inner())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.href)?;
        for (name, value) in &self.params {
            write!(f, "; {}=\"", name)?;
            for c in value.chars() {
                if matches!(c, '"' | '\\') {
                    write!(f, "\\")?;
                }
                write!(f, "{c}")?;
            }
            write!(f, "\"")?;
        }
        Ok(())
    }
}

/// Links of one response, keyed by relation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(IndexMap<String, Link>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a link by its relation, replacing any earlier one
    pub fn insert(&mut self, link: Link) {
        self.0.insert(link.rel().to_string(), link);
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.get(rel)
    }

    /// Like [`Links::get`] but a missing relation is an error
    pub fn require(&self, rel: &str) -> LinkResult<&Link> {
        self.get(rel)
            .ok_or_else(|| LinkError::MissingRelation(rel.to_string()))
    }

    /// Absolute URI of a required relation
    pub fn resolve(&self, rel: &str, base: &str) -> LinkResult<String> {
        self.require(rel)?.resolve(base)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.0.values()
    }
}

impl FromIterator<Link> for Links {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        let mut links = Links::new();
        for link in iter {
            links.insert(link);
        }
        links
    }
}

impl fmt::Display for Links {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, link) in self.0.values().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{link}")?;
        }
        Ok(())
    }
}

impl FromStr for Links {
    type Err = LinkError;

    fn from_str(header: &str) -> LinkResult<Self> {
        parse_link_header(header)
    }
}

/// Parse a `Link` header value into links keyed by relation
///
/// Fails only when no segment can be recognised at all; a header whose
/// segments all lack `rel` parses to an empty set.
pub fn parse_link_header(header: &str) -> LinkResult<Links> {
    let segment = grammar(&SEGMENT)?;
    let param = grammar(&PARAM)?;

    let mut links = Links::new();
    let mut matched = 0usize;
    for caps in segment.captures_iter(header) {
        matched += 1;
        let href = caps.get(1).map_or("", |m| m.as_str());
        let raw_params = caps.get(2).map_or("", |m| m.as_str());

        let mut params = IndexMap::new();
        for p in param.captures_iter(raw_params) {
            let name = p.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
            let value = unquote(p.get(2).map_or("", |m| m.as_str()));
            params.insert(name, value);
        }

        if params.contains_key("rel") {
            links.insert(Link {
                href: href.to_string(),
                params,
            });
        }
    }

    if matched == 0 {
        return Err(LinkError::Malformed(header.to_string()));
    }
    Ok(links)
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
