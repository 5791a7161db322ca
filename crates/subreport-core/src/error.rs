//! Error types for `subreport-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("list {list_id} matched {matches} memberships; expected at most one")]
  AmbiguousCategory { list_id: i64, matches: usize },

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
