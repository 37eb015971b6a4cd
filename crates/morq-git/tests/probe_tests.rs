//! Probing and read-only queries against real clones

use std::fs;

use morq_git::{Checkout, ReferenceKind};
use morq_test_utils::git::{fake_git_dir, git};
use morq_test_utils::{Upstream, WorkspaceDir};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn cloned(upstream: &Upstream) -> (WorkspaceDir, Checkout) {
    let workspace = WorkspaceDir::new();
    let path = workspace.clone_from(upstream, "alpha");
    let checkout = Checkout::probe(&path).expect("clone should probe as present");
    (workspace, checkout)
}

#[test]
fn test_probe_folder_with_broken_git_marker() {
    let workspace = WorkspaceDir::new();
    let folder = workspace.folder("broken");
    fs::create_dir_all(&folder).unwrap();
    fake_git_dir(&folder);

    assert!(Checkout::probe(&folder).is_none());
}

#[test]
fn test_probe_plain_folder_inside_repository() {
    let upstream = Upstream::new();
    let nested = upstream.path().join("nested");
    fs::create_dir_all(&nested).unwrap();

    // Parent directories are not searched
    assert!(Checkout::probe(&nested).is_none());
}

#[rstest]
#[case("main", ReferenceKind::Branch)]
#[case("v1.0", ReferenceKind::Tag)]
#[case("origin/main", ReferenceKind::Unknown)]
#[case("nonexistent-branch", ReferenceKind::Unknown)]
fn test_classify_reference(#[case] reference: &str, #[case] expected: ReferenceKind) {
    let upstream = Upstream::new();
    upstream.tag("v1.0");
    let (_workspace, checkout) = cloned(&upstream);

    assert_eq!(checkout.classify_reference(reference), expected);
}

#[test]
fn test_classify_branch_wins_over_tag() {
    let upstream = Upstream::new();
    upstream.tag("release");
    upstream.branch("release");
    let (_workspace, checkout) = cloned(&upstream);
    git(checkout.path(), &["branch", "release", "origin/release"]);

    assert_eq!(checkout.classify_reference("release"), ReferenceKind::Branch);
}

#[test]
fn test_classify_abbreviated_commit() {
    let upstream = Upstream::new();
    let first = upstream.head();
    upstream.commit();
    let (_workspace, checkout) = cloned(&upstream);

    assert_eq!(checkout.classify_reference(&first[..8]), ReferenceKind::Commit);
    assert!(checkout.is_known_reference(&first[..8]));
}

#[test]
fn test_known_references_include_remote_tracking_names() {
    let upstream = Upstream::new();
    upstream.branch("feature");
    upstream.tag("v2.0");
    let (_workspace, checkout) = cloned(&upstream);

    assert!(checkout.is_known_reference("main"));
    assert!(checkout.is_known_reference("v2.0"));
    assert!(checkout.is_known_reference("origin/feature"));
    // Only a remote-tracking branch exists, not a local one
    assert!(!checkout.is_known_reference("feature"));
    assert!(!checkout.is_known_reference("nonexistent-branch"));
}

#[test]
fn test_behind_is_negative() {
    let upstream = Upstream::new();
    upstream.commits(3);
    let (_workspace, checkout) = cloned(&upstream);
    git(checkout.path(), &["checkout", "--quiet", "--detach", "HEAD~3"]);

    assert_eq!(checkout.commits_ahead_behind("main").unwrap(), -3);
}

#[test]
fn test_ahead_is_positive() {
    let upstream = Upstream::new();
    upstream.commits(2);
    upstream.tag("v1.0");
    upstream.commits(2);
    let (_workspace, checkout) = cloned(&upstream);

    assert_eq!(checkout.commits_ahead_behind("v1.0").unwrap(), 2);
}

#[test]
fn test_same_position_is_zero() {
    let upstream = Upstream::new();
    upstream.tag("v1.0");
    let (_workspace, checkout) = cloned(&upstream);

    assert_eq!(checkout.commits_ahead_behind("v1.0").unwrap(), 0);
    assert_eq!(checkout.commits_ahead_behind("main").unwrap(), 0);
}

#[test]
fn test_diverged_history_reports_behind_only() {
    let upstream = Upstream::new();
    upstream.commits(2);
    let (_workspace, checkout) = cloned(&upstream);

    // One local commit on top of main~2, while main has two commits more
    git(checkout.path(), &["checkout", "--quiet", "--detach", "HEAD~2"]);
    fs::write(checkout.path().join("local.txt"), "local").unwrap();
    git(checkout.path(), &["add", "local.txt"]);
    git(checkout.path(), &["commit", "--quiet", "-m", "Local work"]);

    assert_eq!(checkout.commits_ahead_behind("main").unwrap(), -2);
}

#[test]
fn test_state_ok_for_tracking_branch() {
    let upstream = Upstream::new();
    let (_workspace, checkout) = cloned(&upstream);

    assert!(checkout.is_state_ok("main"));
}

#[test]
fn test_state_not_ok_for_branch_without_upstream() {
    let upstream = Upstream::new();
    let (_workspace, checkout) = cloned(&upstream);
    git(checkout.path(), &["checkout", "--quiet", "-b", "local-only"]);

    assert!(!checkout.is_state_ok("local-only"));
}

#[test]
fn test_state_not_ok_when_branch_ahead_of_upstream() {
    let upstream = Upstream::new();
    let (_workspace, checkout) = cloned(&upstream);
    fs::write(checkout.path().join("local.txt"), "local").unwrap();
    git(checkout.path(), &["add", "local.txt"]);
    git(checkout.path(), &["commit", "--quiet", "-m", "Local work"]);

    assert!(!checkout.is_state_ok("main"));
}

#[test]
fn test_state_ok_for_checked_out_tag() {
    let upstream = Upstream::new();
    upstream.tag("v1.0");
    upstream.commit();
    let (_workspace, checkout) = cloned(&upstream);
    git(checkout.path(), &["checkout", "--quiet", "v1.0"]);

    assert!(checkout.status_text().unwrap().starts_with("HEAD detached at v1.0"));
    assert!(checkout.is_state_ok("v1.0"));
}

#[test]
fn test_state_ok_for_tag_next_to_tree_tag() {
    let upstream = Upstream::new();
    upstream.tag("v1.0");
    git(upstream.path(), &["tag", "tree-snapshot", "HEAD^{tree}"]);
    upstream.commit();
    let (_workspace, checkout) = cloned(&upstream);
    git(checkout.path(), &["checkout", "--quiet", "v1.0"]);

    assert_eq!(checkout.tags_at_head().unwrap(), vec!["v1.0".to_string()]);
    assert!(checkout.status_text().unwrap().starts_with("HEAD detached at v1.0"));
    assert!(checkout.is_state_ok("v1.0"));
}

#[test]
fn test_state_not_ok_for_tag_elsewhere() {
    let upstream = Upstream::new();
    upstream.tag("v1.0");
    upstream.commit();
    let (_workspace, checkout) = cloned(&upstream);

    assert!(!checkout.is_state_ok("v1.0"));
}

#[test]
fn test_state_ok_for_abbreviated_commit() {
    let upstream = Upstream::new();
    let first = upstream.head();
    upstream.commit();
    let (_workspace, checkout) = cloned(&upstream);
    git(checkout.path(), &["checkout", "--quiet", "--detach", &first]);

    assert!(checkout.is_state_ok(&first[..10]));
    assert!(!checkout.is_state_ok(&upstream.head()[..10]));
}

#[test]
fn test_dirty_tracked_modification() {
    let upstream = Upstream::new();
    let (_workspace, checkout) = cloned(&upstream);
    assert!(!checkout.is_dirty().unwrap());

    fs::write(checkout.path().join("README.md"), "edited").unwrap();
    assert!(checkout.is_dirty().unwrap());
}

#[test]
fn test_short_head_id_matches_cli() {
    let upstream = Upstream::new();
    let (_workspace, checkout) = cloned(&upstream);

    assert_eq!(checkout.short_head_id().unwrap(), upstream.head()[..8]);
}
