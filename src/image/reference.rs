//! Image reference resolution
//!
//! A reference string has at most three `/`-separated segments:
//! `[host/][namespace/]repository[:tag]`. With two segments the first one is
//! ambiguous and is classified by shape: it is a registry host if it contains
//! a `.` or a `:`, or is exactly `localhost`; otherwise it is a namespace.
//! With three segments the first one is always taken as the host.

use crate::{ImageRefError, InvalidReason, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Tag used when the reference does not name one
pub const DEFAULT_TAG: &str = "latest";

/// Canonical spelling of the default public registry
pub const DEFAULT_REGISTRY: &str = "index.docker.io";

/// Short alias of the default public registry, rewritten to [`DEFAULT_REGISTRY`]
pub const DOCKER_IO_ALIAS: &str = "docker.io";

/// Scheme prefix carried by orchestrator image UUIDs (`docker:ubuntu:22.04`)
pub const DOCKER_SCHEME_PREFIX: &str = "docker:";

const DEFAULT_REGISTRY_URL: &str = "https://registry-1.docker.io";

/// How an ambiguous leading path segment is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Host,
    Namespace,
}

/// Classify a leading segment by its shape.
///
/// A dot or a colon (`my.registry`, `registry:5000`) or the literal
/// `localhost` marks a registry host. Anything else is a namespace.
pub fn classify_segment(segment: &str) -> SegmentKind {
    if segment.contains('.') || segment.contains(':') || segment == "localhost" {
        SegmentKind::Host
    } else {
        SegmentKind::Namespace
    }
}

/// Split the final segment into repository and optional tag at the first `:`.
pub fn split_tag(segment: &str) -> (&str, Option<&str>) {
    match segment.split_once(':') {
        Some((repository, tag)) => (repository, Some(tag)),
        None => (segment, None),
    }
}

/// Returns true for both spellings of the default public registry
pub fn is_default_registry(host: &str) -> bool {
    host == DEFAULT_REGISTRY || host == DOCKER_IO_ALIAS
}

/// A resolved image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    registry_host: Option<String>,
    namespace: Option<String>,
    repository: String,
    tag: String,
    full_name: String,
    #[serde(skip)]
    explicit_tag: bool,
}

impl Reference {
    /// Parse an image reference string
    pub fn parse(raw: &str) -> Result<Self> {
        parse(raw)
    }

    /// Registry host, `None` for the default public registry when omitted.
    /// `docker.io` is stored as `index.docker.io`.
    pub fn registry_host(&self) -> Option<&str> {
        self.registry_host.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Tag, `latest` when the reference did not name one
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The reference exactly as it was given
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Whether the tag was written out rather than defaulted
    pub fn has_explicit_tag(&self) -> bool {
        self.explicit_tag
    }

    /// Namespace-qualified name without the host, used for registry queries
    pub fn lookup_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}/{}", namespace, self.repository),
            None => self.repository.clone(),
        }
    }

    /// Host-prefixed name used to compare against local images.
    ///
    /// The host is omitted when absent or when it is the default registry.
    pub fn qualified_name(&self) -> String {
        match self.registry_host.as_deref() {
            Some(host) if !is_default_registry(host) => {
                format!("{}/{}", host, self.lookup_name())
            }
            _ => self.lookup_name(),
        }
    }

    /// `qualified_name:tag`, the key a local engine lists images under
    pub fn repo_tag(&self) -> String {
        format!("{}:{}", self.qualified_name(), self.tag)
    }

    /// Check whether a local image tag satisfies this reference
    pub fn matches(&self, candidate_full_tag: &str) -> bool {
        matches(self, candidate_full_tag)
    }

    /// Get the API URL for the registry
    pub fn registry_url(&self) -> String {
        match self.registry_host.as_deref() {
            None => DEFAULT_REGISTRY_URL.to_string(),
            Some(host) if is_default_registry(host) => DEFAULT_REGISTRY_URL.to_string(),
            Some(host) if host.starts_with("localhost") => format!("http://{}", host),
            Some(host) => format!("https://{}", host),
        }
    }

    /// Image and tag as a pull request to a container engine expects them
    pub fn pull_spec(&self) -> PullSpec {
        PullSpec {
            image: self.qualified_name(),
            tag: self.tag.clone(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

impl FromStr for Reference {
    type Err = ImageRefError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Arguments for pulling a resolved reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullSpec {
    /// Image name without tag (`library/cirros`, `registry:5000/team/app`)
    pub image: String,
    pub tag: String,
}

/// Parse an image reference string.
///
/// Fails with [`ImageRefError::InvalidReference`] when the input is empty,
/// has more than three segments, or leaves an empty repository or tag.
pub fn parse(raw: &str) -> Result<Reference> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(ImageRefError::invalid(raw, InvalidReason::Empty));
    }

    let segments: Vec<&str> = input.split('/').collect();
    let (host, namespace, last) = match segments.as_slice() {
        [last] => (None, None, *last),
        [first, last] => match classify_segment(first) {
            SegmentKind::Host => (Some(*first), None, *last),
            SegmentKind::Namespace => (None, Some(*first), *last),
        },
        // No shape check at this arity
        [host, namespace, last] => (Some(*host), Some(*namespace), *last),
        _ => {
            return Err(ImageRefError::invalid(
                raw,
                InvalidReason::TooManySegments(segments.len()),
            ))
        }
    };

    if host == Some("") || namespace == Some("") {
        return Err(ImageRefError::invalid(raw, InvalidReason::EmptySegment));
    }

    let (repository, tag) = split_tag(last);
    if repository.is_empty() {
        return Err(ImageRefError::invalid(raw, InvalidReason::EmptyRepository));
    }
    let (tag, explicit_tag) = match tag {
        None => (DEFAULT_TAG, false),
        Some("") => return Err(ImageRefError::invalid(raw, InvalidReason::EmptyTag)),
        Some(tag) => (tag, true),
    };

    let registry_host = host.map(|h| {
        if h == DOCKER_IO_ALIAS {
            DEFAULT_REGISTRY.to_string()
        } else {
            h.to_string()
        }
    });

    tracing::debug!(
        reference = raw,
        host = ?registry_host,
        namespace = ?namespace,
        repository,
        tag,
        "resolved image reference"
    );

    Ok(Reference {
        registry_host,
        namespace: namespace.map(String::from),
        repository: repository.to_string(),
        tag: tag.to_string(),
        full_name: raw.to_string(),
        explicit_tag,
    })
}

/// Parse an orchestrator image UUID, which may carry a `docker:` prefix.
///
/// The prefix is removed before parsing and is not part of `full_name`.
pub fn parse_image_uuid(raw: &str) -> Result<Reference> {
    let trimmed = raw.trim();
    parse(trimmed.strip_prefix(DOCKER_SCHEME_PREFIX).unwrap_or(trimmed))
}

/// Decide whether a local image tag satisfies a requested reference.
///
/// Repository and qualified name must be equal. A requested reference with
/// no explicit tag accepts any candidate tag; an explicit tag must match
/// exactly. Candidates that fail to parse never match.
pub fn matches(requested: &Reference, candidate_full_tag: &str) -> bool {
    let candidate = match parse(candidate_full_tag) {
        Ok(candidate) => candidate,
        Err(e) => {
            tracing::debug!("Skipping candidate tag: {}", e);
            return false;
        }
    };

    if requested.repository != candidate.repository
        || requested.qualified_name() != candidate.qualified_name()
    {
        return false;
    }

    !requested.explicit_tag || requested.tag == candidate.tag
}
