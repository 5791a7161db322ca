//! CSV rendering of the subscription report.
//!
//! Derives [`ReportRow`]s from subscription records, puts them in
//! presentation order and writes them with the fixed [`columns::COLUMNS`]
//! layout. Synchronous; the whole input is held in memory for sorting.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use subreport_core::subscription;
//! use subreport_csv::{WriterOptions, generate};
//!
//! let records = subscription::from_path(Path::new("subscriptions.json")).unwrap();
//! let summary = generate(&records, Path::new("report.csv"), &WriterOptions::default()).unwrap();
//! println!("{} rows", summary.rows);
//! ```

pub mod columns;
pub mod error;
mod writer;

use std::{borrow::Borrow, io::Write, path::Path};

pub use error::{Error, Result};
use subreport_core::{ReportRow, SubscriptionRecord, build_rows};
use tracing::{debug, info, warn};
pub use writer::ReportWriter;

// ─── Options ──────────────────────────────────────────────────────────────────

/// Default `Until` format: month/day/year with 24-hour time, independent of
/// the host locale.
pub const DEFAULT_UNTIL_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Output formatting knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
  /// Field separator; ASCII, and not the quote character, CR or LF.
  pub delimiter:    char,
  /// `strftime`-style format for the `Until` column.
  pub until_format: String,
}

impl Default for WriterOptions {
  fn default() -> Self {
    Self {
      delimiter:    ',',
      until_format: DEFAULT_UNTIL_FORMAT.to_string(),
    }
  }
}

// ─── Summary ──────────────────────────────────────────────────────────────────

/// Counts describing a written report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
  /// Data rows written (excluding the header).
  pub rows:       usize,
  /// Rows whose subscription details were missing upstream.
  pub api_errors: usize,
  /// Rows without a parseable current price.
  pub unpriced:   usize,
}

impl ReportSummary {
  pub fn of(rows: &[ReportRow]) -> Self {
    Self {
      rows:       rows.len(),
      api_errors: rows.iter().filter(|r| r.is_api_error()).count(),
      unpriced:   rows.iter().filter(|r| r.current_price().is_none()).count(),
    }
  }
}

// ─── Generation ───────────────────────────────────────────────────────────────

/// Write the report for `records` to the file at `destination`, creating or
/// truncating it.
///
/// Rows are derived and sorted before the file is opened, so a malformed
/// record leaves an existing file untouched. A failure while writing leaves
/// the file in an unspecified state; there is no rename-on-success.
pub fn generate<I>(
  records: I,
  destination: &Path,
  options: &WriterOptions,
) -> Result<ReportSummary>
where
  I: IntoIterator,
  I::Item: Borrow<SubscriptionRecord>,
{
  let rows = build_rows(records)?;
  let mut writer = ReportWriter::create(destination, options)?;
  writer.write_rows(&rows)?;
  writer.finish()?;

  let summary = log_summary(&rows);
  info!(
    path = %destination.display(),
    rows = summary.rows,
    "report written"
  );
  Ok(summary)
}

/// Like [`generate`], but writes to an arbitrary sink.
pub fn generate_to_writer<I, W>(
  records: I,
  sink: W,
  options: &WriterOptions,
) -> Result<ReportSummary>
where
  I: IntoIterator,
  I::Item: Borrow<SubscriptionRecord>,
  W: Write,
{
  let rows = build_rows(records)?;
  let mut writer = ReportWriter::new(sink, options)?;
  writer.write_rows(&rows)?;
  writer.finish()?;
  Ok(log_summary(&rows))
}

fn log_summary(rows: &[ReportRow]) -> ReportSummary {
  for row in rows.iter().filter(|r| r.current_price().is_none()) {
    debug!(username = %row.username, status = %row.status, "no current price");
  }

  let summary = ReportSummary::of(rows);
  if summary.api_errors > 0 {
    warn!(
      api_errors = summary.api_errors,
      "some subscriptions had no details and are reported as API errors"
    );
  }
  summary
}
