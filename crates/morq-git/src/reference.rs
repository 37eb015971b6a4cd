//! Reference classification shared by probing and reconciliation
//!
//! A declared reference is an untyped string until it is looked up against a
//! live checkout. Classification only needs three capabilities, captured by
//! [`ReferenceLookup`], so it can be exercised without a repository on disk.

use std::fmt;

/// The kind a declared reference resolves to in a particular checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A local branch
    Branch,
    /// A tag
    Tag,
    /// An object id (full or abbreviated) that is not a reference name
    Commit,
    /// Nothing in the checkout matches
    Unknown,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Branch => "BRANCH",
            ReferenceKind::Tag => "TAG",
            ReferenceKind::Commit => "COMMIT",
            ReferenceKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only lookups needed to classify a reference.
pub trait ReferenceLookup {
    /// Whether a local branch with this exact name exists.
    fn has_branch(&self, name: &str) -> bool;

    /// Whether a tag with this exact name exists.
    fn has_tag(&self, name: &str) -> bool;

    /// Resolve `spec` as an opaque commit identifier.
    ///
    /// Implementations return `None` when resolution fails and also when
    /// `spec` is the name of any reference, so that names never classify as
    /// commits.
    fn resolve_commit(&self, spec: &str) -> Option<String>;
}

/// Classify `reference` against `lookup`.
///
/// Branches win over tags, tags over commits. A failed commit resolution is
/// `Unknown`, never an error.
pub fn classify(lookup: &impl ReferenceLookup, reference: &str) -> ReferenceKind {
    if lookup.has_branch(reference) {
        ReferenceKind::Branch
    } else if lookup.has_tag(reference) {
        ReferenceKind::Tag
    } else if lookup.resolve_commit(reference).is_some() {
        ReferenceKind::Commit
    } else {
        ReferenceKind::Unknown
    }
}
