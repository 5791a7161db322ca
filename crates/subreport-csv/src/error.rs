//! Error types for the CSV report writer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid delimiter {0:?}: must be an ASCII character other than `\"`, CR or LF")]
  InvalidDelimiter(char),

  #[error("invalid date format: {0:?}")]
  InvalidDateFormat(String),

  #[error("report data error: {0}")]
  Core(#[from] subreport_core::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
