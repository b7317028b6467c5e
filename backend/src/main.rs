//! `bookclub` entry point: loads settings, opens the snapshot store and runs
//! one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use bookclub::ClubSettings;
use bookclub::domain::ClubServices;
use bookclub::inbound::cli::{Cli, CliState, dispatch, render, render_error};
use bookclub::outbound::JsonFileClubStateRepository;
use camino::Utf8PathBuf;
use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("bookclub: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<ExitCode> {
    let cli = Cli::try_parse().unwrap_or_else(|error| error.exit());
    let settings = ClubSettings::load_from_iter([OsString::from("bookclub")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    init_tracing(settings.json_logs);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(cli, settings))
}

fn init_tracing(json_logs: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn async_main(cli: Cli, settings: ClubSettings) -> io::Result<ExitCode> {
    let state_dir = cli.state_dir.clone().unwrap_or_else(|| settings.state_dir());
    let state_dir = Utf8PathBuf::from_path_buf(state_dir).map_err(|path| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("state directory must be UTF-8: {}", path.display()),
        )
    })?;
    let state_file = cli
        .state_file
        .clone()
        .unwrap_or_else(|| settings.state_file().to_owned());

    let repository = JsonFileClubStateRepository::open(&state_dir, &state_file)
        .map_err(|error| io::Error::other(format!("open club state: {error}")))?;
    debug!(path = %repository.path(), "opened club state");
    let services = ClubServices::new(Arc::new(repository), Arc::new(DefaultClock));
    let state = CliState::from(services);

    match dispatch(&state, cli.command).await {
        Ok(report) => {
            let output = render(&report, cli.json)
                .map_err(|error| io::Error::other(format!("render output: {error}")))?;
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!("{}", render_error(&error, cli.json));
            Ok(ExitCode::from(2))
        }
    }
}
