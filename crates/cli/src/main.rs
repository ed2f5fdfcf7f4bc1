// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # varaamo
//!
//! Evaluates reservation rules against JSON documents.
//!
//! Each subcommand reads one request document from `--input` or stdin and
//! writes the response as pretty-printed JSON to stdout. Logs go to stderr.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;
use varaamo_api::{
    ActionsRequest, ApiError, AvailabilityRequest, NextAvailableRequest, RecurringRequest,
    evaluate_actions, find_next_available, parse_request, preview_recurring,
    resolve_availability,
};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    init_tracing(args.log_level());

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// `RUST_LOG` takes precedence over the verbosity flags when set.
fn init_tracing(level: LevelFilter) {
    let builder = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .without_time();
    match EnvFilter::try_from_default_env() {
        Ok(filter) => builder.with_env_filter(filter).init(),
        Err(_) => builder.with_max_level(level).init(),
    }
}

#[derive(Debug, Parser)]
#[command(name = "varaamo", author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Read the request from this file instead of stdin
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        let input: String = read_input(self.input.as_deref())?;
        let output: String = self.command.run(&input)?;
        println!("{output}");
        Ok(())
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// List bookable start times for one day
    #[command(visible_alias = "a")]
    Availability,

    /// Find the first bookable start time at or after an instant
    #[command(visible_alias = "n")]
    NextAvailable,

    /// Preview the slots of a recurring reservation
    #[command(visible_alias = "r")]
    Recurring,

    /// Show which actions apply to a reservation
    #[command(visible_alias = "ac")]
    Actions,
}

impl Command {
    /// Runs the command on a JSON request and returns the JSON response.
    fn run(self, input: &str) -> Result<String, ApiError> {
        match self {
            Self::Availability => respond(input, resolve_availability),
            Self::NextAvailable => respond(input, find_next_available),
            Self::Recurring => respond(input, preview_recurring),
            Self::Actions => respond(input, evaluate_actions),
        }
    }
}

fn respond<Req, Resp>(
    input: &str,
    handler: impl FnOnce(&Req) -> Result<Resp, ApiError>,
) -> Result<String, ApiError>
where
    Req: DeserializeOwned,
    Resp: Serialize,
{
    let request: Req = parse_request(input)?;
    let response: Resp = handler(&request)?;
    Ok(serde_json::to_string_pretty(&response)?)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Reading request file");
            fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read {}", path.display()))
        }
        None => {
            debug!("Reading request from stdin");
            io::read_to_string(io::stdin()).wrap_err("Failed to read stdin")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ACTIONS: &str = r#"{
        "now": "2026-06-03T05:00:00Z",
        "state": "REQUIRES_HANDLING",
        "begin": "2026-06-10T09:00:00Z",
        "end": "2026-06-10T10:00:00Z"
    }"#;

    #[test]
    fn test_cli_parses_subcommands_and_input() {
        let args: Args =
            Args::try_parse_from(["varaamo", "next-available", "--input", "req.json", "-v"])
                .unwrap();
        assert_eq!(args.command, Command::NextAvailable);
        assert_eq!(args.input, Some(PathBuf::from("req.json")));
        assert_eq!(args.log_level(), LevelFilter::DEBUG);

        let quiet: Args = Args::try_parse_from(["varaamo", "-q", "actions"]).unwrap();
        assert_eq!(quiet.log_level(), LevelFilter::WARN);
    }

    #[test]
    fn test_actions_command_prints_json() {
        let output: String = Command::Actions.run(ACTIONS).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["canApprove"], true);
        assert_eq!(value["canCancel"], false);
    }

    #[test]
    fn test_wrong_document_for_command_fails() {
        let result: Result<String, ApiError> = Command::Recurring.run(ACTIONS);
        assert!(matches!(result, Err(ApiError::Serialization(_))));
    }

    #[test]
    fn test_read_input_reports_missing_file() {
        let missing: PathBuf = std::env::temp_dir().join("varaamo-missing-request.json");
        assert!(read_input(Some(&missing)).is_err());
    }
}
