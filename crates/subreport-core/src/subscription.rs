//! Subscription records as delivered by the upstream subscriptions endpoint.
//!
//! Only the fields the report reads are modelled; unknown keys are ignored.
//! The upstream service is loose with types (nulls for strings, numbers for
//! prices, textual ids for built-in lists), so decoding is lenient and never
//! rejects a record for those reasons.

use std::{fs::File, io::{BufReader, Read}, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::Result;

// ─── Records ──────────────────────────────────────────────────────────────────

/// One subscriber's relationship to the reporting account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
  #[serde(default, deserialize_with = "null_as_default")]
  pub name:               String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub username:           String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub lists_states:       Vec<ListState>,
  /// Absent when the upstream call for this subscriber's details failed.
  #[serde(default)]
  pub subscribed_by_data: Option<SubscribedByData>,
}

/// Identifier of a list. User-created lists carry numeric ids; built-in
/// lists (e.g. `"fans"`) are identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListId {
  Numeric(i64),
  Named(String),
}

impl ListId {
  pub fn as_numeric(&self) -> Option<i64> {
    match self {
      Self::Numeric(id) => Some(*id),
      Self::Named(_) => None,
    }
  }
}

/// Membership of the subscriber in one of the account's lists.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListState {
  pub id:       ListId,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name:     String,
  #[serde(default)]
  pub has_user: Option<bool>,
}

impl ListState {
  /// `true` only when upstream explicitly reports the subscriber as a member.
  pub fn contains_user(&self) -> bool { self.has_user == Some(true) }
}

/// Pricing, status and expiry of the subscription.
///
/// Prices stay textual: upstream may send numbers, strings, or junk, and the
/// report decides how to interpret them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedByData {
  #[serde(default, deserialize_with = "lenient_text")]
  pub price:         Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub regular_price: Option<String>,
  #[serde(default)]
  pub expired_at:    Option<DateTime<Utc>>,
  #[serde(default)]
  pub status:        Option<String>,
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// Accepted top-level shapes: a bare array, or one page of the paged
/// endpoint (`{ "list": [...], "hasMore": ... }`).
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
  Bare(Vec<SubscriptionRecord>),
  Page { list: Vec<SubscriptionRecord> },
}

/// Decode subscription records from a JSON document.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<SubscriptionRecord>> {
  let document: Document = serde_json::from_reader(reader)?;
  match document {
    Document::Bare(list) | Document::Page { list } => Ok(list),
  }
}

/// Decode subscription records from the JSON file at `path`.
pub fn from_path(path: &Path) -> Result<Vec<SubscriptionRecord>> {
  let file = File::open(path)?;
  from_reader(BufReader::new(file))
}

// ─── Serde helpers ────────────────────────────────────────────────────────────

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep a scalar as its literal text; numbers become their JSON spelling.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) => Some(s),
    Some(Value::Number(n)) => Some(n.to_string()),
    Some(other) => Some(other.to_string()),
  })
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  fn decode(value: Value) -> Vec<SubscriptionRecord> {
    from_reader(value.to_string().as_bytes()).expect("decode")
  }

  #[test]
  fn decodes_bare_array() {
    let records = decode(json!([{
      "name": "Alice",
      "username": "alice",
      "listsStates": [
        { "id": 817758071, "name": "Yours", "hasUser": true },
        { "id": "fans", "name": "Fans", "hasUser": false }
      ],
      "subscribedByData": {
        "price": "4.99",
        "regularPrice": "9.99",
        "expiredAt": "2024-05-01T12:30:00+00:00",
        "status": null,
        "isMuted": false
      }
    }]));

    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.name, "Alice");
    assert_eq!(r.lists_states[0].id, ListId::Numeric(817758071));
    assert!(r.lists_states[0].contains_user());
    assert_eq!(r.lists_states[1].id, ListId::Named("fans".into()));
    assert!(!r.lists_states[1].contains_user());

    let data = r.subscribed_by_data.as_ref().unwrap();
    assert_eq!(data.price.as_deref(), Some("4.99"));
    assert_eq!(data.regular_price.as_deref(), Some("9.99"));
    assert_eq!(
      data.expired_at,
      Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
    );
    assert_eq!(data.status, None);
  }

  #[test]
  fn decodes_paged_envelope() {
    let records = decode(json!({
      "list": [{ "name": "A", "username": "a" }, { "name": "B", "username": "b" }],
      "hasMore": true
    }));
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].username, "b");
  }

  #[test]
  fn nulls_and_missing_fields_become_defaults() {
    let records = decode(json!([{ "name": null, "listsStates": null }]));
    let r = &records[0];
    assert_eq!(r.name, "");
    assert_eq!(r.username, "");
    assert!(r.lists_states.is_empty());
    assert!(r.subscribed_by_data.is_none());
  }

  #[test]
  fn numeric_prices_keep_their_text() {
    let records = decode(json!([{
      "subscribedByData": { "price": 12.5, "regularPrice": 0 }
    }]));
    let data = records[0].subscribed_by_data.as_ref().unwrap();
    assert_eq!(data.price.as_deref(), Some("12.5"));
    assert_eq!(data.regular_price.as_deref(), Some("0"));
  }

  #[test]
  fn rejects_non_json() {
    assert!(from_reader("not json".as_bytes()).is_err());
  }

  #[test]
  fn missing_file_is_io_error() {
    let err = from_path(Path::new("/nonexistent/subscriptions.json")).unwrap_err();
    assert!(matches!(err, crate::Error::Io(_)));
  }
}
