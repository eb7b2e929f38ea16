//! Terminal rendering for bdrive.
//!
//! Progress goes to stdout and anything that went wrong goes to stderr.
//! With `--output json` a single JSON document is the only thing on stdout.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use bdrive_lib::artifacts::{ArtifactReport, ArtifactResult, ArtifactStatus};
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub const BULLET: &str = "•";
pub const ARROW: &str = "→";

/// How a status line should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Good,
  Notice,
  Bad,
}

impl Tone {
  fn mark(self) -> &'static str {
    match self {
      Tone::Good => "✓",
      Tone::Notice => BULLET,
      Tone::Bad => "⚠",
    }
  }

  fn stream(self) -> Stream {
    match self {
      Tone::Good | Tone::Notice => Stream::Stdout,
      Tone::Bad => Stream::Stderr,
    }
  }

  fn paint(self, text: &str) -> String {
    let stream = self.stream();
    match self {
      Tone::Good => text.if_supports_color(stream, |s| s.green()).to_string(),
      Tone::Notice => text.if_supports_color(stream, |s| s.blue()).to_string(),
      Tone::Bad => text.if_supports_color(stream, |s| s.yellow()).to_string(),
    }
  }
}

/// Print one marked status line on the stream that matches its tone.
pub fn status(tone: Tone, message: &str) {
  let line = format!("{} {}", tone.paint(tone.mark()), message);
  match tone {
    Tone::Bad => eprintln!("{}", line),
    Tone::Good | Tone::Notice => println!("{}", line),
  }
}

/// Print an indented `label: value` pair.
pub fn field(label: &str, value: &str) {
  let label = format!("{}:", label);
  println!("  {} {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

/// Wall-clock time at millisecond precision, e.g. `1m 5s 20ms`.
pub fn elapsed(duration: Duration) -> String {
  let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
  humantime::format_duration(Duration::from_millis(millis)).to_string()
}

pub fn emit_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let mut stdout = std::io::stdout().lock();
  serde_json::to_writer_pretty(&mut stdout, value).context("Failed to serialize to JSON")?;
  writeln!(stdout).context("Failed to write JSON output")?;
  Ok(())
}

/// The status line describing one artifact's outcome.
pub fn artifact_line(result: &ArtifactResult) -> (Tone, String) {
  let name = &result.descriptor.name;
  match &result.status {
    ArtifactStatus::Passed => (Tone::Good, format!("{} passed", name)),
    ArtifactStatus::Failed { exit_code } => (Tone::Bad, format!("{} failed (exit code {:?})", name, exit_code)),
    ArtifactStatus::Unstartable { reason } => (Tone::Bad, format!("{} could not be started: {}", name, reason)),
    ArtifactStatus::Missing => (
      Tone::Bad,
      format!("{} not found at {}", name, result.descriptor.expected_path.display()),
    ),
  }
}

/// Per-artifact lines followed by the test tally.
pub fn print_artifacts(report: &ArtifactReport) {
  println!();
  for result in std::iter::once(&report.main).chain(&report.tests) {
    let (tone, line) = artifact_line(result);
    status(tone, &line);
  }

  if report.tests.is_empty() {
    return;
  }

  println!();
  field("Tests passed", &report.tests_passed().to_string());
  field("Tests failed", &report.tests_failed().to_string());
  field("Tests missing", &report.tests_missing().to_string());
}
