//! Manifest parsing for manifest.json files
//!
//! The manifest declares the repositories of a super-repo. It is the single
//! source of truth for declared state:
//!
//! ```json
//! {
//!   "repos": {
//!     "core": { "url": "git@github.com:org/core.git", "ref": "main", "type": "python" },
//!     "docs": { "url": "git@github.com:org/docs.git", "ref": "v1.0", "autodoc": ["api"] }
//!   }
//! }
//! ```
//!
//! Entries keep the order they are written in the file.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Conventional manifest file name, looked up in the current directory.
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

/// One declared repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Unique name, also the local folder name
    pub name: String,

    /// Remote location to clone from
    pub url: String,

    /// Declared branch, tag or commit
    #[serde(rename = "ref")]
    pub reference: String,

    /// Build strategy hint (the `type` key)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Subpaths aggregated by documentation tooling (the `autodoc` key)
    #[serde(rename = "autodoc", skip_serializing_if = "Vec::is_empty")]
    pub doc_paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EntryFields {
    url: String,
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    autodoc: Option<Vec<String>>,
}

/// The parsed manifest: repository entries in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load and validate the manifest at `path`.
    ///
    /// A missing file is reported as [`Error::ManifestNotFound`] so callers
    /// can abort before touching any repository.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&content)?;
        Self::from_value(document).map_err(|e| match e {
            Error::MalformedManifest { message } => Error::InvalidManifest {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse a manifest from JSON content.
    ///
    /// # Example
    ///
    /// ```
    /// use morq_core::Manifest;
    ///
    /// let manifest = Manifest::parse(r#"{
    ///     "repos": {
    ///         "core": { "url": "https://example.com/core.git", "ref": "main" }
    ///     }
    /// }"#).unwrap();
    ///
    /// assert_eq!(manifest.entries()[0].reference, "main");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content)?;
        Self::from_value(document)
    }

    fn from_value(document: Value) -> Result<Self> {
        let repos = match document {
            Value::Object(mut root) => match root.remove("repos") {
                Some(Value::Object(repos)) => repos,
                Some(_) => return Err(invalid("`repos` must be an object")),
                None => return Err(invalid("missing `repos` object")),
            },
            _ => return Err(invalid("top level must be an object")),
        };

        Self::from_repos(repos)
    }

    fn from_repos(repos: Map<String, Value>) -> Result<Self> {
        let mut entries = Vec::with_capacity(repos.len());

        for (name, value) in repos {
            validate_name(&name)?;

            let fields: EntryFields =
                serde_json::from_value(value).map_err(|e| Error::InvalidEntry {
                    name: name.clone(),
                    message: e.to_string(),
                })?;

            entries.push(ManifestEntry {
                name,
                url: fields.url,
                reference: fields.reference,
                kind: fields.kind,
                doc_paths: fields.autodoc.unwrap_or_default(),
            });
        }

        Ok(Self { entries })
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn invalid(message: &str) -> Error {
    Error::MalformedManifest {
        message: message.to_string(),
    }
}

/// Entry names become folder names next to the manifest, and purge deletes
/// them recursively, so they must be exactly one plain path component.
fn validate_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if name.is_empty() || !single_normal || name.contains(['/', '\\']) {
        return Err(Error::InvalidEntry {
            name: name.to_string(),
            message: "name must be a single folder name".to_string(),
        });
    }
    Ok(())
}
