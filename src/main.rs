//! Host bridge: drives the search state machine over JSON lines.
//!
//! A browser shell (or a test script) writes one [`Event`] per line on stdin
//! and reads one output object per line on stdout:
//!
//! - `{"action": ...}` for every [`Action`] the host must perform
//! - `{"render": {"search": ..., "artists": ...}}` whenever the view changed
//! - `{"error": {"message": ...}}` for input lines that are not valid events
//!
//! # Usage
//!
//! ```text
//! eventsync [config=<file.toml>] [key=value ...]
//! ```
//!
//! Keys are the [`Config`] fields; `key=value` arguments override values from
//! the TOML file. With `fixture=<results.json>` the bridge answers `Fetch`
//! actions itself from the fixture and feeds the completions straight back in,
//! so only URL writes, failures and renders reach stdout.
//!
//! # Example
//!
//! ```text
//! $ printf '%s\n' '{"page_loaded":{"query":"keyword=bts"}}' '{"sentinel_visibility":{"visible":true}}' \
//!     | eventsync fixture=results.json
//! ```

#![allow(clippy::multiple_crate_versions)]

use eventsync::fetch::{execute, FixtureSource};
use eventsync::ui::{ArtistPickerViewModel, SearchViewModel};
use eventsync::{handle_event, initialize, Action, AppState, Config, Event, EventSyncError};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// One line of bridge output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Output<'a> {
    Action(&'a Action),
    Render {
        search: SearchViewModel,
        artists: ArtistPickerViewModel,
    },
    Error {
        message: String,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("eventsync: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> eventsync::Result<()> {
    let config = parse_args(std::env::args().skip(1))?;
    eventsync::observability::init_tracing(&config);

    let span = tracing::debug_span!("bridge_run");
    let _guard = span.entered();

    let mut source = config
        .fixture
        .as_ref()
        .map(FixtureSource::from_file)
        .transpose()?;
    tracing::debug!(fixture = ?config.fixture, "bridge starting");

    let mut state = initialize(&config);
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for (line_number, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let _line_span = tracing::debug_span!("bridge_input", line_number).entered();
        match serde_json::from_str::<Event>(&line) {
            Ok(event) => process(&mut state, event, &mut source, &mut out)?,
            Err(e) => {
                tracing::warn!(error = %e, "rejected input line");
                emit(
                    &mut out,
                    &Output::Error {
                        message: EventSyncError::Protocol(format!("line {}: {e}", line_number + 1))
                            .to_string(),
                    },
                )?;
            }
        }
    }

    tracing::debug!("stdin closed, bridge exiting");
    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> eventsync::Result<Config> {
    let mut map = BTreeMap::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(EventSyncError::Config(format!(
                "expected key=value, got `{arg}`"
            )));
        };
        map.insert(key.trim().to_string(), value.to_string());
    }

    match map.get("config") {
        Some(path) => Ok(Config::from_file(path)?.with_overrides(&map)),
        None => Ok(Config::from_map(&map)),
    }
}

/// Runs one input event to quiescence, executing fetches locally when a
/// fixture is loaded.
fn process(
    state: &mut AppState,
    event: Event,
    source: &mut Option<FixtureSource>,
    out: &mut impl Write,
) -> eventsync::Result<()> {
    let mut queue = VecDeque::from([event]);

    while let Some(event) = queue.pop_front() {
        let (render, actions) = handle_event(state, &event)?;

        for action in &actions {
            if let (Action::Fetch(request), Some(source)) = (action, source.as_mut()) {
                queue.push_back(Event::FetchCompleted(execute(source, request)));
                continue;
            }
            emit(out, &Output::Action(action))?;
        }

        if render {
            emit(
                out,
                &Output::Render {
                    search: state.search.compute_viewmodel(),
                    artists: state.artists.compute_viewmodel(),
                },
            )?;
        }
    }

    Ok(())
}

fn emit(out: &mut impl Write, output: &Output<'_>) -> eventsync::Result<()> {
    serde_json::to_writer(&mut *out, output)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
