//! Layer rules for the bookclub workspace.
//!
//! The lint parses `backend/src/{domain,inbound,outbound}` and
//! `crates/rotation/src` with `syn` and checks every path each file names
//! against a fixed rule table. Each rule bars one layer from one module,
//! crate or item and carries the reason shown when it is broken. Besides
//! the usual hexagon boundaries, the table keeps the rotation crate free of
//! the club, funnels queue arithmetic through `RotationEngine`, and keeps
//! the CLI off the club aggregate.
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

mod paths;
mod rules;

pub use rules::Layer;

use paths::named_paths;
use rules::RULES;

/// Source roots the lint walks, relative to the workspace root.
pub const LINTED_ROOTS: [&str; 2] = ["backend/src", "crates/rotation/src"];

/// A Rust source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to the workspace root.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

/// One broken rule in one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    /// Path relative to the workspace root.
    pub file: PathBuf,
    /// Layer the file belongs to.
    pub layer: Layer,
    /// The module, crate or item the file named.
    pub target: String,
    /// Why the layer may not name it.
    pub reason: &'static str,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} must not name {} ({})",
            self.file.display(),
            self.layer,
            self.target,
            self.reason
        )
    }
}

fn bulleted(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("\n- {violation}"))
        .collect()
}

/// Failures reported by the lint.
#[derive(Debug, Error)]
pub enum LintError {
    /// Walking a source root failed.
    #[error("walking {}: {source}", root.display())]
    Walk {
        /// Root being walked.
        root: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },
    /// A source file could not be read.
    #[error("reading {}: {source}", file.display())]
    Read {
        /// Unreadable file.
        file: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A source was handed to the lint from outside every layer.
    #[error("{} is outside every linted layer", file.display())]
    Unlayered {
        /// Offending path.
        file: PathBuf,
    },
    /// A source file is not valid Rust.
    #[error("parsing {}: {message}", file.display())]
    Parse {
        /// Unparsable file.
        file: PathBuf,
        /// Parser message.
        message: String,
    },
    /// One or more rules were broken.
    #[error("{} architecture violation(s):{}", .0.len(), bulleted(.0))]
    Violations(Vec<Violation>),
}

/// Lint the workspace rooted at `root`, returning how many files passed.
///
/// Source roots that do not exist are skipped.
pub fn lint_workspace(root: &Path) -> Result<usize, LintError> {
    let sources = collect_sources(root)?;
    lint_sources(&sources)?;
    Ok(sources.len())
}

/// Lint in-memory sources whose paths are relative to the workspace root.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), LintError> {
    let mut violations = BTreeSet::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| LintError::Unlayered {
            file: source.file.clone(),
        })?;
        let parsed = syn::parse_file(&source.contents).map_err(|err| LintError::Parse {
            file: source.file.clone(),
            message: err.to_string(),
        })?;
        let named = named_paths(&parsed);
        for rule in RULES.iter().filter(|rule| rule.applies_to(layer, &source.file)) {
            if named.iter().any(|segments| rule.target.is_named_by(segments)) {
                violations.insert(Violation {
                    file: source.file.clone(),
                    layer,
                    target: rule.target.to_string(),
                    reason: rule.reason,
                });
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(LintError::Violations(violations.into_iter().collect()))
    }
}

fn collect_sources(root: &Path) -> Result<Vec<LintSource>, LintError> {
    let mut sources = Vec::new();
    for linted in LINTED_ROOTS {
        let dir = root.join(linted);
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|source| LintError::Walk {
                root: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_rust = path.extension().is_some_and(|ext| ext == "rs");
            if !entry.file_type().is_file() || !is_rust {
                continue;
            }
            let file = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            if Layer::of(&file).is_none() {
                continue;
            }
            let contents = fs::read_to_string(path).map_err(|source| LintError::Read {
                file: file.clone(),
                source,
            })?;
            sources.push(LintSource { file, contents });
        }
    }
    Ok(sources)
}

#[cfg(test)]
mod tests;
