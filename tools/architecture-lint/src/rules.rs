//! Dependency rules for each linted part of the workspace.

use std::fmt;
use std::path::Path;

/// Library name of the backend crate, as written in `use bookclub::...`.
pub(crate) const CRATE_NAME: &str = "bookclub";

/// A linted part of the workspace, inferred from a workspace-relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// `crates/rotation/src`: circular queue arithmetic.
    Rotation,
    /// `backend/src/domain`: club rules, ports and services.
    Domain,
    /// `backend/src/inbound`: the command-line adapter.
    Inbound,
    /// `backend/src/outbound`: club state repositories.
    Outbound,
}

impl Layer {
    /// Layer owning `file`, or `None` for files the lint ignores.
    pub fn of(file: &Path) -> Option<Self> {
        if file.starts_with("crates/rotation/src") {
            return Some(Self::Rotation);
        }
        let within_backend = file.strip_prefix("backend/src").ok()?;
        match within_backend.components().next()?.as_os_str().to_str()? {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rotation => "rotation crate",
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        })
    }
}

/// Something a layer may be barred from naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// A top-level module of the backend crate.
    Module(&'static str),
    /// An external crate, matched on the first path segment.
    Crate(&'static str),
    /// A type or function named anywhere in a path.
    Item(&'static str),
}

impl Target {
    pub(crate) fn is_named_by(self, segments: &[String]) -> bool {
        match self {
            Self::Module(module) => internal_root(segments) == Some(module),
            Self::Crate(name) => segments.first().is_some_and(|first| first == name),
            Self::Item(item) => segments.iter().any(|segment| segment == item),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(module) => write!(f, "crate::{module}"),
            Self::Crate(name) => write!(f, "crate `{name}`"),
            Self::Item(item) => write!(f, "`{item}`"),
        }
    }
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First module named by `segments` once relative prefixes are skipped.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    let root = match first {
        "crate" | "self" | "super" => segments.iter().find(|segment| !is_relative(segment))?,
        CRATE_NAME => segments.get(1)?,
        _ => return Some(first),
    };
    Some(root.as_str())
}

/// One forbidden dependency.
#[derive(Debug)]
pub(crate) struct Rule {
    pub(crate) layer: Layer,
    pub(crate) target: Target,
    /// Workspace-relative files exempt from the rule.
    pub(crate) allowed_in: &'static [&'static str],
    pub(crate) reason: &'static str,
}

const fn rule(layer: Layer, target: Target, reason: &'static str) -> Rule {
    Rule {
        layer,
        target,
        allowed_in: &[],
        reason,
    }
}

const PURE_QUEUE: &str = "queue arithmetic stays synchronous and club-agnostic";
const PORTS_ONLY: &str = "the domain reaches adapters only through its ports";
const STORAGE: &str = "filesystem access belongs to the outbound repositories";
const BINARY: &str = "arguments and settings are parsed by the binary and inbound";
const NO_LOGS: &str = "domain failures travel as Error values";
const VIA_PORTS: &str = "the CLI drives the club through command and query ports";
const BELOW_SERVICES: &str = "repositories sit below the services that call them";

/// Every rule the lint enforces.
pub(crate) const RULES: &[Rule] = &[
    rule(Layer::Rotation, Target::Crate(CRATE_NAME), PURE_QUEUE),
    rule(Layer::Rotation, Target::Crate("chrono"), PURE_QUEUE),
    Rule {
        layer: Layer::Rotation,
        target: Target::Crate("serde_json"),
        allowed_in: &["crates/rotation/src/tests.rs"],
        reason: PURE_QUEUE,
    },
    rule(Layer::Rotation, Target::Crate("tokio"), PURE_QUEUE),
    rule(Layer::Rotation, Target::Crate("tracing"), PURE_QUEUE),
    rule(Layer::Domain, Target::Module("inbound"), PORTS_ONLY),
    rule(Layer::Domain, Target::Module("outbound"), PORTS_ONLY),
    rule(Layer::Domain, Target::Crate("camino"), STORAGE),
    rule(Layer::Domain, Target::Crate("cap_std"), STORAGE),
    rule(Layer::Domain, Target::Crate("fs2"), STORAGE),
    rule(Layer::Domain, Target::Crate("tempfile"), STORAGE),
    rule(Layer::Domain, Target::Crate("clap"), BINARY),
    rule(Layer::Domain, Target::Crate("ortho_config"), BINARY),
    rule(Layer::Domain, Target::Crate("tracing"), NO_LOGS),
    rule(Layer::Domain, Target::Crate("tracing_subscriber"), NO_LOGS),
    Rule {
        layer: Layer::Domain,
        target: Target::Crate("rotation"),
        allowed_in: &[
            "backend/src/domain/rotation_engine.rs",
            "backend/src/domain/club.rs",
        ],
        reason: "queue changes go through RotationEngine so members are validated",
    },
    rule(Layer::Inbound, Target::Module("outbound"), VIA_PORTS),
    rule(Layer::Inbound, Target::Item("ClubState"), VIA_PORTS),
    rule(Layer::Inbound, Target::Item("ClubUnitOfWork"), VIA_PORTS),
    rule(Layer::Inbound, Target::Crate("rotation"), VIA_PORTS),
    rule(Layer::Inbound, Target::Crate("camino"), STORAGE),
    rule(Layer::Inbound, Target::Crate("cap_std"), STORAGE),
    rule(Layer::Inbound, Target::Crate("fs2"), STORAGE),
    rule(Layer::Inbound, Target::Crate("tempfile"), STORAGE),
    rule(Layer::Outbound, Target::Module("inbound"), BELOW_SERVICES),
    rule(Layer::Outbound, Target::Item("ClubServices"), BELOW_SERVICES),
    rule(Layer::Outbound, Target::Item("ClubUnitOfWork"), BELOW_SERVICES),
    rule(Layer::Outbound, Target::Crate("clap"), BINARY),
    rule(Layer::Outbound, Target::Crate("ortho_config"), BINARY),
    rule(Layer::Outbound, Target::Crate("tracing_subscriber"), BINARY),
];

impl Rule {
    pub(crate) fn applies_to(&self, layer: Layer, file: &Path) -> bool {
        self.layer == layer && !self.allowed_in.iter().any(|allowed| file == Path::new(allowed))
    }
}
