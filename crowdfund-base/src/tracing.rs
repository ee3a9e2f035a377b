// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tracing setup shared by the crowdfund binaries.
//!
//! Everything is configured from the environment:
//! - `RUST_LOG` selects the verbosity (`info` by default),
//! - `RUST_LOG_SPAN_EVENTS` is a comma-separated list of span events to report
//!   (`new`, `enter`, `exit`, `close`, `active`, `full`),
//! - `RUST_LOG_FORMAT` is one of `plain`, `json` or `pretty`,
//! - `NO_COLOR` disables colors on the terminal,
//! - `CROWDFUND_LOG_DIR` additionally appends the logs to `<dir>/<log_name>.log`.

use std::{
    env,
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use is_terminal::IsTerminal as _;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{
        self,
        format::{FmtSpan, Format, Full},
        time::FormatTime,
        FormatFields, MakeWriter,
    },
    layer::{Layer, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt as _,
    EnvFilter,
};

/// The environment variable naming the directory of log files.
pub const LOG_DIR_VARIABLE: &str = "CROWDFUND_LOG_DIR";

/// How log lines are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One compact line per event.
    #[default]
    Plain,
    /// One JSON object per event.
    Json,
    /// Multi-line, human-oriented output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "plain" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!(
                "invalid log format `{other}`: expected `plain`, `json` or `pretty`"
            )),
        }
    }
}

/// The logging options read from the environment.
#[derive(Clone, Debug)]
pub struct LogSettings {
    /// The rendering of log lines, on the terminal and in the log file.
    pub format: LogFormat,
    /// Which span lifecycle events are logged.
    pub span_events: FmtSpan,
    /// Whether terminal output is colored.
    pub color: bool,
    /// Where the log file goes, if anywhere.
    pub log_file: Option<PathBuf>,
}

impl LogSettings {
    /// Reads the settings for a binary whose log file is called `log_name`.
    ///
    /// An unknown `RUST_LOG_FORMAT` falls back to [`LogFormat::Plain`] after printing a
    /// message to stderr.
    pub fn from_env(log_name: &str) -> Self {
        let format = match env::var("RUST_LOG_FORMAT") {
            Ok(value) => value.parse().unwrap_or_else(|error| {
                eprintln!("{error}; using `plain`");
                LogFormat::Plain
            }),
            Err(_) => LogFormat::Plain,
        };
        let span_events = env::var("RUST_LOG_SPAN_EVENTS")
            .map(|events| parse_span_events(&events))
            .unwrap_or(FmtSpan::NONE);
        let no_color = env::var("NO_COLOR").is_ok_and(|value| !value.is_empty());
        let log_file = env::var_os(LOG_DIR_VARIABLE)
            .map(|directory| PathBuf::from(directory).join(format!("{log_name}.log")));
        LogSettings {
            format,
            span_events,
            color: !no_color && io::stderr().is_terminal(),
            log_file,
        }
    }
}

/// Installs the global subscriber, configured from the environment.
pub fn init(log_name: &str) {
    init_with(LogSettings::from_env(log_name));
}

/// Installs the global subscriber with explicit settings.
///
/// The log file is skipped, with a message on stderr, if it cannot be opened.
pub fn init_with(settings: LogSettings) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let terminal = formatted(
        settings.format,
        fmt::layer()
            .with_span_events(settings.span_events.clone())
            .with_writer(io::stderr)
            .with_ansi(settings.color),
    );

    let file = settings
        .log_file
        .as_ref()
        .and_then(|path| match append_to(path) {
            Ok(file) => Some(file),
            Err(error) => {
                eprintln!("cannot open log file {}: {error}", path.display());
                None
            }
        })
        .map(|file| {
            formatted(
                settings.format,
                fmt::layer()
                    .with_span_events(settings.span_events)
                    .with_writer(Arc::new(file))
                    .with_ansi(false),
            )
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(file)
        .with(terminal)
        .init();
}

fn append_to(path: &Path) -> io::Result<File> {
    OpenOptions::new().append(true).create(true).open(path)
}

fn formatted<S, N, W, T>(
    format: LogFormat,
    layer: fmt::Layer<S, N, Format<Full, T>, W>,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    N: for<'writer> FormatFields<'writer> + Send + Sync + 'static,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    T: FormatTime + Send + Sync + 'static,
{
    match format {
        LogFormat::Plain => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

/// Parses a comma-separated list of span events. Unknown names are ignored.
pub fn parse_span_events(events: &str) -> FmtSpan {
    events
        .split(',')
        .map(|event| match event.trim() {
            "new" => FmtSpan::NEW,
            "enter" => FmtSpan::ENTER,
            "exit" => FmtSpan::EXIT,
            "close" => FmtSpan::CLOSE,
            "active" => FmtSpan::ACTIVE,
            "full" => FmtSpan::FULL,
            _ => FmtSpan::NONE,
        })
        .fold(FmtSpan::NONE, |events, event| events | event)
}
