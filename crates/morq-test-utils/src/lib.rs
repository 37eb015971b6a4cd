//! Shared test utilities for the morq workspace.
//!
//! This crate provides standardised git fixtures so every crate's tests build
//! upstream repositories and workspaces the same way. It is a dev-dependency
//! only and never published.
//!
//! # Modules
//!
//! - [`git`]: upstream repositories, clones, and manifest workspaces

pub mod git;

pub use git::{Upstream, WorkspaceDir, clone_checkout, git, head_id};
