//! Console and log-file output for [`Logger`](super::Logger) events.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{format_utc_datetime, format_utc_time, strip_ansi};

/// Target marking stage headers.
pub(super) const STAGE_TARGET: &str = "naive_config_sync::stage";
/// Target marking actions skipped by `--dry-run`.
pub(super) const DRY_RUN_TARGET: &str = "naive_config_sync::dry_run";

/// How an event is rendered, derived from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn of(event: &tracing::Event<'_>) -> Self {
        let metadata = event.metadata();
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text line for the log file.
    fn file_line(self, ts: &str, msg: &str) -> String {
        match self {
            Self::Stage => format!("[{ts}] ==> {msg}"),
            Self::DryRun => format!("[{ts}]     [dry run] {msg}"),
            Self::Error => format!("[{ts}]     [error] {msg}"),
            Self::Warn => format!("[{ts}]     [warn] {msg}"),
            Self::Debug => format!("[{ts}]     [debug] {msg}"),
            Self::Info => format!("[{ts}]     {msg}"),
        }
    }
}

/// The `message` field of an event.
fn message_of(event: &tracing::Event<'_>) -> String {
    #[derive(Default)]
    struct Visitor(String);

    impl tracing::field::Visit for Visitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.0 = value.to_string();
            }
        }
    }

    let mut visitor = Visitor::default();
    event.record(&mut visitor);
    visitor.0
}

/// Layer appending every event to `<home>/logs/<command>.log`, timestamped
/// and without colour codes.
#[derive(Debug)]
pub(crate) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Start a fresh log at `path` with a version and date header.
    ///
    /// `None` when the file cannot be created; the run then logs to the
    /// console only.
    pub(crate) fn new(path: &Path) -> Option<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        let version = option_env!("NAIVE_CONFIG_SYNC_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\nnaive-config-sync {version} {}\n{rule}\n",
            format_utc_datetime()
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let line = Kind::of(event).file_line(&format_utc_time(), &strip_ansi(&message_of(event)));
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Terminal rendering: bold stage arrows, `[DRY RUN]` markers and coloured
/// level prefixes.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let msg = message_of(event);
        match Kind::of(event) {
            Kind::Error => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            Kind::Warn => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            Kind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::DryRun => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Kind::Info => writeln!(writer, "  {msg}"),
            Kind::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the process-wide subscriber. Call once, before the first event.
///
/// Warnings and errors go to stderr, everything else to stdout. Debug lines
/// reach the console only with `verbose`, but always reach `log_file`.
pub fn init_subscriber(verbose: bool, log_file: Option<&Path>) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(ConsoleFormatter)
                .with_writer(make_writer)
                .with_filter(console_level),
        )
        .with(
            log_file
                .and_then(FileLayer::new)
                .map(|layer| layer.with_filter(LevelFilter::DEBUG)),
        )
        .init();
}
