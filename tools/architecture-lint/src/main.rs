//! Checks the bookclub layer rules.
//!
//! Usage: `cargo run -p architecture-lint [WORKSPACE_ROOT]`. Without an
//! argument the nearest ancestor of the current directory whose
//! `Cargo.toml` declares `[workspace]` is linted.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|manifest| manifest.contains("[workspace]"))
        })
        .map(Path::to_path_buf)
}

fn main() -> ExitCode {
    let root = match std::env::args_os().nth(1) {
        Some(arg) => Some(PathBuf::from(arg)),
        None => std::env::current_dir()
            .ok()
            .and_then(|cwd| workspace_root(&cwd)),
    };
    let Some(root) = root else {
        let _ = writeln!(
            io::stderr(),
            "no workspace Cargo.toml above the current directory; pass the workspace root"
        );
        return ExitCode::FAILURE;
    };

    match architecture_lint::lint_workspace(&root) {
        Ok(checked) => {
            let _ = writeln!(io::stdout(), "{checked} files follow the layer rules");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let _ = writeln!(io::stderr(), "{err}");
            ExitCode::FAILURE
        }
    }
}
