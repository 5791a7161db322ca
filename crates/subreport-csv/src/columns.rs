//! The fixed column layout of the report.
//!
//! The two price lineages share the `Price` / `Tax` / `Total` headers;
//! consumers rely on that layout, so the duplicates stay.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use subreport_core::ReportRow;

// ─── Fields ───────────────────────────────────────────────────────────────────

/// A report row field that can be placed in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  Username,
  Category,
  Status,
  Until,
  CurrentPrice,
  CurrentTax,
  CurrentTotal,
  RenewPrice,
  RenewTax,
  RenewTotal,
}

impl Field {
  /// Render this field of `row` as cell text. Absent values render empty.
  pub(crate) fn render(self, row: &ReportRow, until_format: &str) -> String {
    match self {
      Field::Name         => row.name.clone(),
      Field::Username     => row.username.clone(),
      Field::Category     => row.category.clone(),
      Field::Status       => row.status.clone(),
      Field::Until        => format_until(row.until, until_format),
      Field::CurrentPrice => format_decimal(row.current_price()),
      Field::CurrentTax   => format_decimal(row.current_tax()),
      Field::CurrentTotal => format_decimal(row.current_total()),
      Field::RenewPrice   => format_decimal(row.renew_price()),
      Field::RenewTax     => format_decimal(row.renew_tax()),
      Field::RenewTotal   => format_decimal(row.renew_total()),
    }
  }
}

// ─── Column mapping ───────────────────────────────────────────────────────────

/// One physical column: its position, header text and source field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
  pub index:  usize,
  pub header: &'static str,
  pub field:  Field,
}

const fn column(index: usize, header: &'static str, field: Field) -> Column {
  Column { index, header, field }
}

/// Report columns in output order.
pub const COLUMNS: [Column; 11] = [
  column(0, "Name", Field::Name),
  column(1, "Username", Field::Username),
  column(2, "Category", Field::Category),
  column(3, "Status", Field::Status),
  column(4, "Until", Field::Until),
  column(5, "Price", Field::CurrentPrice),
  column(6, "Tax", Field::CurrentTax),
  column(7, "Total", Field::CurrentTotal),
  column(8, "Price", Field::RenewPrice),
  column(9, "Tax", Field::RenewTax),
  column(10, "Total", Field::RenewTotal),
];

/// Header cells in output order.
pub fn headers() -> impl Iterator<Item = &'static str> {
  COLUMNS.iter().map(|c| c.header)
}

/// Data cells for `row` in output order.
pub(crate) fn cells(row: &ReportRow, until_format: &str) -> Vec<String> {
  COLUMNS
    .iter()
    .map(|c| c.field.render(row, until_format))
    .collect()
}

// ─── Formatting ───────────────────────────────────────────────────────────────

/// Decimals keep their scale (`120.000` stays `120.000`); `Display` on
/// [`Decimal`] always uses `.` and no grouping.
fn format_decimal(value: Option<Decimal>) -> String {
  value.map(|d| d.to_string()).unwrap_or_default()
}

fn format_until(until: Option<DateTime<Utc>>, format: &str) -> String {
  until
    .map(|t| t.format(format).to_string())
    .unwrap_or_default()
}
