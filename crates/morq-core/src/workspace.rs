//! The super-repo workspace: a manifest plus the folder it lives in

use std::path::{Path, PathBuf};

use crate::manifest::{Manifest, ManifestEntry};
use crate::Result;

/// A loaded manifest together with the directory its checkouts live in.
///
/// Every entry's checkout is the folder `<root>/<entry name>`, where `root`
/// is the directory containing the manifest file.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    manifest: Manifest,
}

impl Workspace {
    /// Load the manifest at `manifest_path` and anchor the workspace next to it.
    ///
    /// A missing manifest is reported by [`Manifest::load`] under the path
    /// as given.
    pub fn open(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let resolved = manifest_path.canonicalize()?;
        let root = resolved
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        tracing::debug!(
            manifest = %resolved.display(),
            entries = manifest.len(),
            "Loaded manifest"
        );

        Ok(Self { root, manifest })
    }

    /// Build a workspace from an already parsed manifest.
    pub fn new(root: impl Into<PathBuf>, manifest: Manifest) -> Self {
        Self {
            root: root.into(),
            manifest,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Folder holding the checkout for `entry`.
    pub fn folder_path(&self, entry: &ManifestEntry) -> PathBuf {
        self.root.join(&entry.name)
    }
}
