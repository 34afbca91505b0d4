//! Asset tag classification and date-driven derivations
//!
//! Asset tags come in three shapes: words (`oldspare03`), small incrementing
//! numbers from the early inventory (`000000042`), and purchase dates
//! (`2019-05-01`), which is the default for everything bought since.
//! Only date-based tags carry an age.

use crate::field;
use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use snipeflow_client::Record;

const CUMULATIVE_DAYS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetTagClass {
    /// No leading number, e.g. `oldspare03`
    WordBased,
    /// Leading number below 100
    Incremental,
    /// Leading number of 100 or more, read as a date
    DateBased,
}

impl AssetTagClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetTagClass::WordBased => "word-based",
            AssetTagClass::Incremental => "incremental",
            AssetTagClass::DateBased => "date-based",
        }
    }
}

impl std::fmt::Display for AssetTagClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an asset tag by the integer at its start
pub fn classify(asset_tag: &str) -> AssetTagClass {
    match leading_integer(asset_tag) {
        0 => AssetTagClass::WordBased,
        n if n < 100 => AssetTagClass::Incremental,
        _ => AssetTagClass::DateBased,
    }
}

/// Integer prefix of `s` (optional sign, then digits); 0 when there is none
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -value } else { value }
}

/// Parse a date-based asset tag (`2019-05-01` or `20190501`)
pub fn tag_date(asset_tag: &str) -> Option<NaiveDate> {
    let tag = asset_tag.trim();
    NaiveDate::parse_from_str(tag, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(tag, "%Y%m%d"))
        .ok()
}

/// Day count on a 365-day calendar; Feb 29 counts as Feb 28
fn day_number(date: NaiveDate) -> i64 {
    let month = date.month0() as usize;
    let day = date.day().min(MONTH_DAYS[month]) as i64;
    date.year() as i64 * 365 + CUMULATIVE_DAYS[month] + day
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Approximate age in years, rounded to 3 decimals.
///
/// Leap years are ignored. `None` for tags that are not date-based or do not
/// parse as a date.
pub fn asset_age(asset_tag: &str, today: NaiveDate) -> Option<f64> {
    if classify(asset_tag) != AssetTagClass::DateBased {
        return None;
    }
    let purchased = tag_date(asset_tag)?;
    let days = day_number(today) - day_number(purchased);
    Some(round3(days as f64 / 365.0))
}

/// Straight-line depreciated value; fully depreciated at `depreciation_years`
pub fn estimated_price(
    purchase_cost: Option<f64>,
    age: Option<f64>,
    depreciation_years: f64,
) -> Option<f64> {
    let cost = purchase_cost?;
    let age = age?;
    Some(cost * (1.0 - age.min(depreciation_years) / depreciation_years))
}

/// Purchase cost as a number; strings like `"1,299.00"` are accepted
pub fn purchase_cost(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',').collect();
            cleaned.trim().parse().ok()
        }
        _ => None,
    }
}

/// Warranty expiry date from `warranty_expires.date`
pub fn warranty_expiry(record: &Record) -> Option<NaiveDate> {
    let date = field::resolve(record, "warranty_expires.date")?;
    let date = date.as_str()?;
    NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()
}

/// In warranty when an expiry date exists and lies after `today`
pub fn in_warranty(record: &Record, today: NaiveDate) -> bool {
    warranty_expiry(record).is_some_and(|expires| expires > today)
}
