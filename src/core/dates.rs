//! Reporting date resolution for invoices.

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

use super::types::{InvoiceRecord, PeriodField};

/// Why no reporting date could be taken from an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodDateError {
    /// Neither the selected field nor `issued_on` carries a value.
    #[error("no period date")]
    Missing,
    /// A value is present but matches none of the accepted formats.
    #[error("unparseable date '{0}'")]
    Unparseable(String),
}

type DateParser = fn(&str) -> Option<NaiveDate>;

/// Accepted date formats, tried in order.
const DATE_FORMATS: &[(&str, DateParser)] = &[
    ("YYYY-MM-DD", |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
    ("RFC 3339 timestamp", |s| {
        DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
    }),
];

/// Parse a date in any of the accepted formats.
///
/// Timestamps yield the calendar date in their own offset, so a `Z`
/// suffix means the UTC date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, PeriodDateError> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|(_, parse)| parse(s))
        .ok_or_else(|| PeriodDateError::Unparseable(raw.to_string()))
}

/// The date that decides which month `invoice` is reported in.
///
/// Uses `field`, falling back to `issued_on` when `field` is absent or empty.
pub fn resolve_period_date(
    invoice: &InvoiceRecord,
    field: PeriodField,
) -> Result<NaiveDate, PeriodDateError> {
    let raw = field
        .value(invoice)
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.issued_on.as_deref().filter(|s| !s.is_empty()))
        .ok_or(PeriodDateError::Missing)?;
    parse_date(raw)
}
