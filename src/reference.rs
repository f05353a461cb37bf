//! Uniform naming of Hosts and Processes (§4.1).
//!
//! A [`Reference`] is an immutable identity carried as a URL. Hierarchy is
//! encoded in the path: `.parent()` strips one segment, `.child(name)`
//! appends one. Two references are equal iff their canonical string forms
//! match, so the canonical string is computed once at construction and
//! reused for every `Hash`/`Eq`/pool-key lookup afterwards.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use url::Url;

// Layer 3: Internal module imports
use crate::error::ReferenceError;

/// Whether a [`Reference`] names a Host or a Process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Host,
    Process,
}

/// An immutable, URL-keyed identity for a Host or Process.
///
/// Cloning is cheap: the canonical string is stored behind an `Arc` so a
/// `Reference` clone never re-parses or re-allocates the URL.
///
/// # Example
/// ```rust
/// use nexus_rt::reference::{Reference, ReferenceKind};
///
/// let root = Reference::process("proc://a").unwrap();
/// let child = root.child("x").unwrap();
/// assert_eq!(child.to_string(), "proc://a/x");
/// assert_eq!(child.parent().unwrap(), root);
/// assert!(root.owns(&child));
/// assert_eq!(child.kind(), ReferenceKind::Process);
/// ```
#[derive(Debug, Clone)]
pub struct Reference {
    kind: ReferenceKind,
    url: Arc<Url>,
    canonical: Arc<str>,
}

impl Reference {
    fn new(kind: ReferenceKind, url: Url) -> Result<Self, ReferenceError> {
        let canonical: Arc<str> = Arc::from(url.as_str());
        Ok(Self {
            kind,
            url: Arc::new(url),
            canonical,
        })
    }

    fn parse(kind: ReferenceKind, raw: &str) -> Result<Self, ReferenceError> {
        let url = Url::parse(raw).map_err(|_| ReferenceError::NotAbsolute(raw.to_string()))?;
        Self::new(kind, url)
    }

    /// Construct a Host reference from an absolute URL string.
    pub fn host(raw: &str) -> Result<Self, ReferenceError> {
        Self::parse(ReferenceKind::Host, raw)
    }

    /// Construct a Process reference from an absolute URL string.
    pub fn process(raw: &str) -> Result<Self, ReferenceError> {
        Self::parse(ReferenceKind::Process, raw)
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// The canonical string form used for equality, hashing, and pool keys.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    fn path_segments(&self) -> Vec<&str> {
        self.url
            .path_segments()
            .map(|segs| segs.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Strip one path segment. Errors if this reference is already a root.
    pub fn parent(&self) -> Result<Self, ReferenceError> {
        let segments = self.path_segments();
        if segments.is_empty() {
            return Err(ReferenceError::NoParent(self.canonical.to_string()));
        }
        let mut url = (*self.url).clone();
        {
            let mut path_mut = url
                .path_segments_mut()
                .map_err(|_| ReferenceError::NoParent(self.canonical.to_string()))?;
            path_mut.pop();
        }
        Self::new(self.kind, url)
    }

    /// Append a single, non-empty path segment.
    pub fn child(&self, name: &str) -> Result<Self, ReferenceError> {
        if name.is_empty() {
            return Err(ReferenceError::EmptySegment);
        }
        let mut url = (*self.url).clone();
        {
            let mut path_mut = url
                .path_segments_mut()
                .map_err(|_| ReferenceError::EmptySegment)?;
            path_mut.push(name);
        }
        Self::new(self.kind, url)
    }

    /// `self` owns `other` iff `other`'s canonical path starts with `self`'s.
    pub fn owns(&self, other: &Reference) -> bool {
        other.canonical.starts_with(self.canonical.as_ref())
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Reference {}

impl std::hash::Hash for Reference {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Serialize for Reference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct Wire<'a> {
            kind: ReferenceKind,
            url: &'a str,
        }
        Wire {
            kind: self.kind,
            url: &self.canonical,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            kind: ReferenceKind,
            url: String,
        }
        let wire = Wire::deserialize(deserializer)?;
        Self::parse(wire.kind, &wire.url).map_err(serde::de::Error::custom)
    }
}
