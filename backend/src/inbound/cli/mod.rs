//! Command-line adapter.
//!
//! [`command`] defines the argument grammar, [`dispatch`] routes each command
//! to a driving port and [`render`] turns the result into terminal output.

pub mod command;
pub mod dispatch;
pub mod render;
pub mod state;

pub use command::{Cli, ClubCommand};
pub use dispatch::{Report, dispatch};
pub use render::{render, render_error};
pub use state::CliState;
