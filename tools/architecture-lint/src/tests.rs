//! Rule table behaviour over in-memory sources.

use std::path::{Path, PathBuf};

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), LintError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

fn violations_of(file: &str, contents: &str) -> Vec<Violation> {
    match lint_one(file, contents) {
        Err(LintError::Violations(violations)) => violations,
        other => panic!("expected violations for {file}, got {other:?}"),
    }
}

#[rstest]
#[case("crates/rotation/src/lib.rs", Some(Layer::Rotation))]
#[case("backend/src/domain/club.rs", Some(Layer::Domain))]
#[case("backend/src/inbound/cli/render.rs", Some(Layer::Inbound))]
#[case("backend/src/outbound/snapshot/mod.rs", Some(Layer::Outbound))]
#[case("backend/src/settings.rs", None)]
#[case("tools/architecture-lint/src/lib.rs", None)]
fn layers_follow_the_workspace_layout(#[case] file: &str, #[case] expected: Option<Layer>) {
    assert_eq!(Layer::of(Path::new(file)), expected);
}

#[rstest]
#[case("crates/rotation/src/lib.rs", "use serde::Serialize; use thiserror::Error;")]
#[case("crates/rotation/src/tests.rs", "fn f() { let _ = serde_json::json!([]); }")]
#[case("backend/src/domain/rotation_engine.rs", "use rotation::{RotationError, RotationQueue};")]
#[case("backend/src/domain/club.rs", "use rotation::RotationQueue; use serde_json::json;")]
#[case("backend/src/domain/unit_of_work.rs", "use mockable::Clock; use tokio::sync::Mutex;")]
#[case("backend/src/inbound/cli/state.rs", "use crate::domain::ports::{ClubStateRepository, QueueQuery};")]
#[case("backend/src/outbound/snapshot/mod.rs", "use fs2::FileExt; use crate::domain::ClubState;")]
#[case("backend/src/outbound/memory.rs", "fn f() { tracing::debug!(\"saved\"); }")]
fn permitted_dependencies_pass(#[case] file: &str, #[case] contents: &str) {
    let result = lint_one(file, contents);
    assert!(result.is_ok(), "result: {result:?}");
}

#[rstest]
#[case("crates/rotation/src/lib.rs", "use bookclub::domain::MemberId;", "crate `bookclub`")]
#[case("crates/rotation/src/lib.rs", "use serde_json::Value;", "crate `serde_json`")]
#[case("backend/src/domain/queue_service.rs", "use rotation::RotationQueue;", "crate `rotation`")]
#[case("backend/src/domain/club.rs", "use crate::outbound::InMemoryClubStateRepository;", "crate::outbound")]
#[case("backend/src/domain/club.rs", "use bookclub::inbound::cli::Cli;", "crate::inbound")]
#[case("backend/src/domain/quorum.rs", "fn f() { tracing::info!(\"marked\"); }", "crate `tracing`")]
#[case("backend/src/domain/lifecycle.rs", "use fs2::FileExt;", "crate `fs2`")]
#[case("backend/src/inbound/cli/dispatch.rs", "use crate::domain::ClubState;", "`ClubState`")]
#[case("backend/src/inbound/cli/state.rs", "use super::super::super::outbound::memory;", "crate::outbound")]
#[case("backend/src/inbound/cli/render.rs", "fn f(q: &rotation::RotationQueue<u64>) {}", "crate `rotation`")]
#[case("backend/src/outbound/memory.rs", "use crate::domain::ClubUnitOfWork;", "`ClubUnitOfWork`")]
#[case("backend/src/outbound/snapshot/mod.rs", "use clap::Parser;", "crate `clap`")]
fn broken_rules_name_the_target(
    #[case] file: &str,
    #[case] contents: &str,
    #[case] target: &str,
) {
    let violations = violations_of(file, contents);
    assert_eq!(violations.len(), 1, "violations: {violations:?}");
    let violation = violations.first().expect("one violation");
    assert_eq!(violation.file, PathBuf::from(file));
    assert_eq!(violation.target, target);
}

#[rstest]
fn violations_carry_the_reason() {
    let violations = violations_of(
        "backend/src/domain/turn_coordinator.rs",
        "use rotation::RotationQueue;",
    );
    let rendered = violations.first().map(ToString::to_string).unwrap_or_default();
    assert_eq!(
        rendered,
        "backend/src/domain/turn_coordinator.rs: domain must not name crate `rotation` \
         (queue changes go through RotationEngine so members are validated)"
    );
}

#[rstest]
fn one_violation_per_target_however_often_it_is_named() {
    let contents = "use clap::Parser; use clap::Subcommand; \
                    fn f() { let _ = clap::Command::new(\"x\"); tracing::warn!(\"x\"); }";
    let targets: Vec<String> = violations_of("backend/src/domain/member.rs", contents)
        .into_iter()
        .map(|violation| violation.target)
        .collect();
    assert_eq!(targets, ["crate `clap`", "crate `tracing`"]);
}

#[rstest]
fn grouped_and_renamed_imports_are_seen() {
    let contents = "use crate::{domain::Error, outbound::{memory as mem, snapshot::*}};";
    let violations = violations_of("backend/src/inbound/cli/mod.rs", contents);
    assert_eq!(violations.len(), 1);
}

#[rstest]
fn unlayered_sources_are_rejected() {
    let err = lint_one("backend/src/main.rs", "fn main() {}").expect_err("no layer");
    assert!(matches!(err, LintError::Unlayered { .. }), "error: {err:?}");
}

#[rstest]
fn unparsable_sources_are_reported() {
    let err = lint_one("backend/src/domain/book.rs", "fn broken(").expect_err("syntax error");
    let LintError::Parse { file, .. } = err else {
        panic!("expected a parse error");
    };
    assert_eq!(file, PathBuf::from("backend/src/domain/book.rs"));
}
