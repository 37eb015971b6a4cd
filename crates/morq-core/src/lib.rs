//! Core orchestration layer for morq
//!
//! This crate sits between the git primitives and the command line:
//!
//! - **Manifest**: the declared repositories of a super-repo
//! - **ReconciliationEngine**: check and update checkouts against the manifest
//! - **Builder**: install and test commands per repository
//! - **Purge**: removal of all declared checkouts
//!
//! # Architecture
//!
//! ```text
//!   morq-cli
//!      |
//!   morq-core   manifest -> engine / builder / purge -> Report
//!      |
//!   morq-git    Checkout, classify, clone/checkout/pull
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use morq_core::{ReconciliationEngine, Workspace};
//!
//! fn example() -> morq_core::Result<()> {
//!     let workspace = Workspace::open(Path::new("manifest.json"))?;
//!     let report = ReconciliationEngine::new(&workspace).check_all();
//!     for record in report.records() {
//!         println!("{} {}", record.folder, record.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod purge;
pub mod report;
pub mod runner;
pub mod status;
pub mod workspace;

pub use builder::{BUILD_COLUMNS, BuildStrategy, Builder, StepRecord, StepResult, TEST_COLUMNS};
pub use engine::{ReconciliationEngine, UpdatePlan, plan_update};
pub use error::{Error, Result};
pub use manifest::{DEFAULT_MANIFEST_FILE, Manifest, ManifestEntry};
pub use purge::{PURGE_COLUMNS, PurgeOutcome, PurgeRecord, purge_all};
pub use report::{Report, Tabular};
pub use runner::{CommandOutcome, CommandRunner, OutputDedup, SPAWN_FAILURE_CODE};
pub use status::{CHECK_COLUMNS, Position, Status, StatusRecord, UPDATE_COLUMNS, UpdateTag};
pub use workspace::Workspace;
