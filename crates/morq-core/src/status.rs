//! Status taxonomy for reconciliation records
//!
//! The rendered tokens (`Missing`, `Invalid`, `OK`, `N/A`, `New`, `Changed`,
//! `Unchanged`, `Dirty`, `-<n> behind`, `<n> ahead`) are read by downstream
//! tooling and must not change.

use std::fmt;

use morq_git::ReferenceKind;
use serde::{Serialize, Serializer};

use crate::manifest::ManifestEntry;
use crate::report::Tabular;

/// Columns of a check report.
pub const CHECK_COLUMNS: [&str; 4] = ["folder", "ref", "position", "status"];

/// Columns of an update report.
pub const UPDATE_COLUMNS: [&str; 5] = ["folder", "ref", "position", "status", "update"];

/// How a checkout relates to its declared reference, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No local checkout
    Missing,
    /// Declared reference unknown to the checkout, or it could not be reached
    Invalid,
    /// Checkout matches the declaration
    Ok,
    /// `HEAD` is behind the reference by this many commits
    Behind(u64),
    /// `HEAD` is ahead of the reference by this many commits
    Ahead(u64),
    /// Uncommitted local modifications
    Dirty,
}

impl Status {
    /// Status for a signed ahead/behind delta, `None` for zero.
    pub fn from_delta(delta: i64) -> Option<Self> {
        match delta {
            0 => None,
            d if d < 0 => Some(Status::Behind(d.unsigned_abs())),
            d => Some(Status::Ahead(d as u64)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Missing => f.write_str("Missing"),
            Status::Invalid => f.write_str("Invalid"),
            Status::Ok => f.write_str("OK"),
            Status::Behind(n) => write!(f, "-{n} behind"),
            Status::Ahead(n) => write!(f, "{n} ahead"),
            Status::Dirty => f.write_str("Dirty"),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What an update run did to a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTag {
    /// Cloned during this run
    New,
    /// `HEAD` moved
    Changed,
    /// `HEAD` stayed where it was
    Unchanged,
    /// Nothing was attempted, or pulling failed
    NotApplicable,
    /// Re-checking out the declared reference failed after pulling
    Invalid,
}

impl fmt::Display for UpdateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateTag::New => "New",
            UpdateTag::Changed => "Changed",
            UpdateTag::Unchanged => "Unchanged",
            UpdateTag::NotApplicable => "N/A",
            UpdateTag::Invalid => "Invalid",
        })
    }
}

impl Serialize for UpdateTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where the checkout was found to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// No checkout
    None,
    /// The reference could not be resolved
    Invalid,
    /// At the declared reference
    Reference(String),
    /// At this abbreviated commit
    Commit(String),
    /// Reference kind annotation, used for dirty checkouts
    Kind(ReferenceKind),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::None => f.write_str("None"),
            Position::Invalid => f.write_str("Invalid"),
            Position::Reference(name) => f.write_str(name),
            Position::Commit(id) => f.write_str(id),
            Position::Kind(kind) => write!(f, "{kind}"),
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of checking or updating one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub folder: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub position: Position,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateTag>,
}

impl StatusRecord {
    pub fn new(
        entry: &ManifestEntry,
        position: Position,
        status: Status,
        update: Option<UpdateTag>,
    ) -> Self {
        Self {
            folder: entry.name.clone(),
            reference: entry.reference.clone(),
            position,
            status,
            update,
        }
    }
}

impl Tabular for StatusRecord {
    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.folder.clone(),
            self.reference.clone(),
            self.position.to_string(),
            self.status.to_string(),
        ];
        if let Some(update) = self.update {
            cells.push(update.to_string());
        }
        cells
    }
}
