//! Core types for the subscription report.
//!
//! Holds the upstream subscription record shape and the derivation of
//! display-ready report rows from it. Free of CSV and filesystem-output
//! concerns; `subreport-csv` builds on top of this crate.

pub mod error;
pub mod report;
pub mod subscription;

pub use error::{Error, Result};
pub use report::{Pricing, ReportRow, build_rows, sort_rows};
pub use subscription::{ListId, ListState, SubscribedByData, SubscriptionRecord};
