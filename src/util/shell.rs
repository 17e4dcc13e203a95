//! Terminal output for the CLI.
//!
//! Status lines, unit progress and JSON events all go through [`Shell`].
//! Human output is written to stderr with a right-aligned status word;
//! `--message-format json` replaces it with one JSON object per line on
//! stdout.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

/// Width of the status column.
const STATUS_WIDTH: usize = 12;

/// How much human output to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    #[default]
    Normal,
    /// One line per resolved unit instead of a progress bar
    Verbose,
}

/// `--color` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color when stderr is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ("auto", ColorChoice::Auto),
            ("always", ColorChoice::Always),
            ("never", ColorChoice::Never),
        ]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, choice)| choice)
        .ok_or_else(|| format!("unknown color setting `{}` (use auto, always or never)", s))
    }
}

/// Status word shown in front of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Mapping,
    Building,
    Resolving,
    Wrote,
    Finished,
    Info,
    Error,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Mapping => "Mapping",
            Status::Building => "Building",
            Status::Resolving => "Resolving",
            Status::Wrote => "Wrote",
            Status::Finished => "Finished",
            Status::Info => "Info",
            Status::Error => "error",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Status::Mapping | Status::Building | Status::Resolving => "1;36",
            Status::Wrote | Status::Finished => "1;32",
            Status::Info => "1;34",
            Status::Error => "1;31",
        }
    }
}

/// Output sink shared by a command.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    json: bool,
    color: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice, json: bool) -> Self {
        Shell {
            verbosity,
            json,
            color: !json && color.enabled(),
        }
    }

    /// Build a shell from the global CLI flags.
    ///
    /// JSON output wins over `--quiet` and `--verbose`, and quiet wins
    /// over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice, json: bool) -> Self {
        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Shell::new(verbosity, color, json)
    }

    pub fn is_quiet(&self) -> bool {
        !self.json && self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        !self.json && self.verbosity == Verbosity::Verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn use_color(&self) -> bool {
        self.color
    }

    /// Print `{status:>12} {msg}` to stderr.
    ///
    /// Quiet shells only print errors; JSON shells print nothing.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.json || (self.is_quiet() && status != Status::Error) {
            return;
        }
        eprintln!("{} {}", self.prefix(status), msg);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Report an error, as an `error` event in JSON mode.
    pub fn error(&self, msg: impl Display) {
        if self.json {
            self.json_event(&json!({ "reason": "error", "message": msg.to_string() }));
        } else {
            self.status(Status::Error, msg);
        }
    }

    /// Print one JSON event line to stdout. Ignored outside JSON mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.json {
            return;
        }
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", event);
        let _ = stdout.flush();
    }

    fn prefix(&self, status: Status) -> String {
        let label = format!("{:>width$}", status.label(), width = STATUS_WIDTH);
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", status.ansi(), label)
        } else {
            label
        }
    }

    /// Start timing a command.
    pub fn span(self: &Arc<Self>) -> Span {
        Span {
            shell: Arc::clone(self),
            start: Instant::now(),
        }
    }

    /// Progress over `total` items.
    ///
    /// Normal shells draw a bar, verbose shells print a line per item and
    /// JSON shells emit `progress` events.
    pub fn progress(self: &Arc<Self>, total: u64, msg: impl Display) -> Progress {
        let message = msg.to_string();
        let bar = if self.verbosity == Verbosity::Normal && !self.json && total > 1 {
            let bar = ProgressBar::new(total);
            let template = "{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}";
            if let Ok(style) = ProgressStyle::default_bar().template(template) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar.set_message(message.clone());
            Some(bar)
        } else {
            None
        };

        Progress {
            shell: Arc::clone(self),
            bar,
            total,
            current: 0,
            message,
        }
    }
}

/// Timing for a whole command.
pub struct Span {
    shell: Arc<Shell>,
    start: Instant,
}

impl Span {
    /// Print `Finished {msg} in {duration}`.
    pub fn finish_with_message(self, msg: impl Display) {
        let elapsed = format_duration(self.start.elapsed());
        self.shell
            .status(Status::Finished, format!("{} in {}", msg, elapsed));
    }
}

/// Progress over the units of a resolution pass.
pub struct Progress {
    shell: Arc<Shell>,
    bar: Option<ProgressBar>,
    total: u64,
    current: u64,
    message: String,
}

impl Progress {
    /// Record that `item` is done.
    pub fn inc(&mut self, item: impl Display) {
        self.current += 1;

        if let Some(bar) = &self.bar {
            bar.inc(1);
        } else if self.shell.is_json() {
            self.shell.json_event(&json!({
                "reason": "progress",
                "message": self.message,
                "item": item.to_string(),
                "current": self.current,
                "total": self.total,
            }));
        } else if self.shell.is_verbose() {
            eprintln!(
                "  {} {} [{}/{}]",
                self.message, item, self.current, self.total
            );
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
