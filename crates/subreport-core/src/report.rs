//! Report rows — the display-ready projection of a subscription record.
//!
//! A [`ReportRow`] is computed once from a borrowed record and never looks at
//! the record again; every field is a pure function of the source.

use std::{borrow::Borrow, cmp::Ordering, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
  Error, Result,
  subscription::{ListState, SubscribedByData, SubscriptionRecord},
};

// ─── Constants ────────────────────────────────────────────────────────────────

/// List id whose membership classifies a subscriber under the "Yours" label.
pub const YOURS_LIST_ID: i64 = 817_758_071;

/// List id checked when the subscriber is not on the [`YOURS_LIST_ID`] list.
pub const MINE_LIST_ID: i64 = 817_758_033;

/// Fixed tax rate applied to every price (20%, written `0.2`).
pub const TAX_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// Category of a subscriber on neither reserved list.
pub const NO_CATEGORY: &str = "None";

/// Status of a subscription whose details carry no explicit status.
pub const STATUS_SUBSCRIBED: &str = "Subscribed";

/// Status of a record whose subscription details could not be fetched.
pub const STATUS_API_ERROR: &str = "API Error";

// ─── Pricing ──────────────────────────────────────────────────────────────────

/// A price with its tax and tax-inclusive total. All three are absent
/// together when the price text is not a decimal number.
///
/// Tax or total that would overflow [`Decimal`] is absent as well; the
/// parsed price is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pricing {
  pub price: Option<Decimal>,
  pub tax:   Option<Decimal>,
  pub total: Option<Decimal>,
}

impl Pricing {
  /// Parse `text` and derive tax and total from it.
  pub fn from_text(text: Option<&str>) -> Self {
    Self::from_price(text.and_then(parse_price))
  }

  pub fn from_price(price: Option<Decimal>) -> Self {
    let tax = price.and_then(|p| p.checked_mul(TAX_RATE));
    let total = price.zip(tax).and_then(|(p, t)| p.checked_add(t));
    Self { price, tax, total }
  }
}

/// Parse a price; anything that is not a plain decimal number is absent.
pub fn parse_price(text: &str) -> Option<Decimal> {
  let text = text.trim();
  if text.is_empty() {
    return None;
  }
  Decimal::from_str(text).ok()
}

// ─── Report row ───────────────────────────────────────────────────────────────

/// Display-ready view of one [`SubscriptionRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
  pub name:            String,
  pub username:        String,
  pub category:        String,
  pub status:          String,
  pub until:           Option<DateTime<Utc>>,
  /// Derived from the current price.
  pub current:         Pricing,
  /// Derived from the regular (renewal) price.
  pub renew:           Pricing,
  /// The subscription details were missing upstream.
  pub details_missing: bool,
}

impl ReportRow {
  /// Derive the row for `record`.
  ///
  /// Fails only when the record's list memberships are malformed (see
  /// [`resolve_category`]).
  pub fn derive(record: &SubscriptionRecord) -> Result<Self> {
    let data = record.subscribed_by_data.as_ref();
    Ok(Self {
      name:            record.name.clone(),
      username:        record.username.clone(),
      category:        resolve_category(&record.lists_states)?,
      status:          resolve_status(data),
      until:           data.and_then(|d| d.expired_at),
      current:         Pricing::from_text(data.and_then(|d| d.price.as_deref())),
      renew:           Pricing::from_text(data.and_then(|d| d.regular_price.as_deref())),
      details_missing: data.is_none(),
    })
  }

  pub fn current_price(&self) -> Option<Decimal> { self.current.price }

  pub fn current_tax(&self) -> Option<Decimal> { self.current.tax }

  pub fn current_total(&self) -> Option<Decimal> { self.current.total }

  pub fn renew_price(&self) -> Option<Decimal> { self.renew.price }

  pub fn renew_tax(&self) -> Option<Decimal> { self.renew.tax }

  pub fn renew_total(&self) -> Option<Decimal> { self.renew.total }

  /// Whether the row carries the [`STATUS_API_ERROR`] sentinel because the
  /// details were missing, as opposed to an upstream status of that text.
  pub fn is_api_error(&self) -> bool { self.details_missing }
}

// ─── Field resolution ─────────────────────────────────────────────────────────

/// Name of the reserved list the subscriber belongs to, checking
/// [`YOURS_LIST_ID`] before [`MINE_LIST_ID`]; [`NO_CATEGORY`] otherwise.
///
/// Returns [`Error::AmbiguousCategory`] if the list being probed matches more
/// than one membership entry.
pub fn resolve_category(lists: &[ListState]) -> Result<String> {
  for list_id in [YOURS_LIST_ID, MINE_LIST_ID] {
    if let Some(list) = single_membership(lists, list_id)? {
      return Ok(list.name.clone());
    }
  }
  Ok(NO_CATEGORY.to_string())
}

/// The one entry for `list_id` that contains the user, if any.
fn single_membership(
  lists: &[ListState],
  list_id: i64,
) -> Result<Option<&ListState>> {
  let mut matches = lists
    .iter()
    .filter(|l| l.id.as_numeric() == Some(list_id) && l.contains_user());

  let first = matches.next();
  let extra = matches.count();
  if extra > 0 {
    return Err(Error::AmbiguousCategory {
      list_id,
      matches: extra + 1,
    });
  }
  Ok(first)
}

/// Explicit status when present, [`STATUS_SUBSCRIBED`] when the details have
/// none, [`STATUS_API_ERROR`] when the details are missing entirely.
pub fn resolve_status(data: Option<&SubscribedByData>) -> String {
  match data {
    Some(d) => match d.status.as_deref() {
      Some(s) if !s.is_empty() => s.to_string(),
      _ => STATUS_SUBSCRIBED.to_string(),
    },
    None => STATUS_API_ERROR.to_string(),
  }
}

// ─── Ordering ─────────────────────────────────────────────────────────────────

/// Presentation order: category descending (byte-wise), then current total
/// ascending.
///
/// A row without a current total orders before every row that has one. This
/// treats "no computable total" like zero cost and is a deliberate policy.
pub fn report_order(a: &ReportRow, b: &ReportRow) -> Ordering {
  b.category
    .cmp(&a.category)
    .then_with(|| a.current_total().cmp(&b.current_total()))
}

/// Sort rows into presentation order. Stable: ties keep input order.
pub fn sort_rows(rows: &mut [ReportRow]) { rows.sort_by(report_order); }

/// Derive a row for every record and sort the result.
///
/// The first malformed record aborts the whole batch.
pub fn build_rows<I>(records: I) -> Result<Vec<ReportRow>>
where
  I: IntoIterator,
  I::Item: Borrow<SubscriptionRecord>,
{
  let mut rows = records
    .into_iter()
    .map(|r| ReportRow::derive(r.borrow()))
    .collect::<Result<Vec<_>>>()?;
  sort_rows(&mut rows);
  Ok(rows)
}
