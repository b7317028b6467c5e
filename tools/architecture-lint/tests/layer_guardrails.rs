//! Runs the lint over workspace layouts written to a temporary directory.

use std::path::{Path, PathBuf};

use architecture_lint::{LintError, lint_workspace};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Workspace {
    _guard: TempDir,
    root: Dir,
    path: PathBuf,
}

impl Workspace {
    fn write(&self, relative: &str, contents: &str) {
        let file = Path::new(relative);
        if let Some(parent) = file.parent() {
            self.root.create_dir_all(parent).expect("create module dir");
        }
        self.root.write(file, contents).expect("write source");
    }
}

fn empty_workspace() -> Workspace {
    let guard = tempfile::tempdir().expect("temp dir");
    let root = Dir::open_ambient_dir(guard.path(), ambient_authority()).expect("open temp dir");
    Workspace {
        path: guard.path().to_path_buf(),
        root,
        _guard: guard,
    }
}

#[fixture]
fn workspace() -> Workspace {
    let workspace = empty_workspace();
    workspace.write("Cargo.toml", "[workspace]\nmembers = [\"backend\", \"crates/rotation\"]\n");
    workspace.write("crates/rotation/src/lib.rs", "use thiserror::Error; pub struct RotationQueue;");
    workspace.write("backend/src/lib.rs", "pub mod domain; pub mod inbound; pub mod outbound;");
    workspace.write("backend/src/main.rs", "use clap::Parser; fn main() { tracing::info!(\"up\"); }");
    workspace.write(
        "backend/src/domain/rotation_engine.rs",
        "use rotation::RotationQueue; pub struct RotationEngine(RotationQueue);",
    );
    workspace.write("backend/src/domain/club.rs", "use super::rotation_engine::RotationEngine;");
    workspace.write("backend/src/inbound/cli/command.rs", "use clap::Parser; use crate::domain::ports::QueueQuery;");
    workspace.write(
        "backend/src/outbound/snapshot/mod.rs",
        "use cap_std::fs::Dir; use fs2::FileExt; use crate::domain::ClubState;",
    );
    workspace.write("backend/src/outbound/snapshot/notes.txt", "use clap::Parser;");
    workspace
}

#[rstest]
fn clean_workspace_passes(workspace: Workspace) {
    let checked = lint_workspace(&workspace.path).expect("clean layout");
    assert_eq!(checked, 5);
}

#[rstest]
fn violations_across_the_workspace_are_all_reported(workspace: Workspace) {
    workspace.write("crates/rotation/src/club.rs", "use bookclub::domain::MemberId;");
    workspace.write("backend/src/domain/queue_service.rs", "use rotation::RotationQueue;");
    workspace.write("backend/src/inbound/cli/state.rs", "use bookclub::outbound::JsonFileClubStateRepository;");

    let Err(LintError::Violations(violations)) = lint_workspace(&workspace.path) else {
        panic!("expected violations");
    };
    let files: Vec<String> = violations
        .iter()
        .map(|violation| violation.file.display().to_string())
        .collect();
    assert_eq!(
        files,
        [
            "backend/src/domain/queue_service.rs",
            "backend/src/inbound/cli/state.rs",
            "crates/rotation/src/club.rs",
        ]
    );
}

#[rstest]
fn missing_source_roots_are_skipped() {
    let workspace = empty_workspace();
    workspace.write("backend/src/domain/mod.rs", "pub struct Club;");
    assert_eq!(lint_workspace(&workspace.path).expect("rotation crate is optional"), 1);
}
