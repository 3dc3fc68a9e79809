//! Month bucketing of raw invoices.
//!
//! One pass over the fetched invoices decides for each record whether it
//! counts towards a statement and, if so, which month it belongs to. Totals
//! are accumulated as exact decimals.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use super::dates::{PeriodDateError, resolve_period_date};
use super::error::FilingError;
use super::months::MonthKey;
use super::types::{DocumentType, InvoiceDetail, InvoiceRecord, JurisdictionPair, PeriodField};

/// Default country excluded from EU reporting (the seller's home country).
pub const DEFAULT_EXCLUDE_COUNTRY: &str = "CZ";

/// Parameters of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Date that decides the reporting month.
    pub period_field: PeriodField,
    /// Client country whose invoices are domestic and therefore skipped.
    /// Compared uppercased; empty disables the filter.
    pub exclude_country: String,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            period_field: PeriodField::default(),
            exclude_country: DEFAULT_EXCLUDE_COUNTRY.into(),
        }
    }
}

/// Accumulated data for one reporting month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    total: Decimal,
    jurisdictions: BTreeSet<JurisdictionPair>,
    details: Vec<InvoiceDetail>,
}

impl MonthBucket {
    /// Exact sum of `native_subtotal` over the counted invoices.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Number of counted invoices.
    pub fn count(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Distinct counterparties seen in this month, sorted.
    pub fn jurisdictions(&self) -> &BTreeSet<JurisdictionPair> {
        &self.jurisdictions
    }

    /// Counted invoices in input order.
    pub fn details(&self) -> &[InvoiceDetail] {
        &self.details
    }

    /// Count one invoice. Leaves the bucket unchanged and returns `false`
    /// when the total would overflow.
    fn add(
        &mut self,
        amount: Decimal,
        pair: Option<JurisdictionPair>,
        detail: InvoiceDetail,
    ) -> bool {
        let Some(total) = self.total.checked_add(amount) else {
            return false;
        };
        self.total = total;
        if let Some(pair) = pair {
            self.jurisdictions.insert(pair);
        }
        self.details.push(detail);
        true
    }
}

/// Why an invoice did not count towards any month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Proformas, corrections, tax documents and unknown types.
    NotAnInvoice(String),
    /// `cancelled_at` is set.
    Cancelled,
    /// Client country equals the excluded (home) country.
    ExcludedCountry,
    /// Neither the period field nor `issued_on` has a value.
    MissingPeriodDate,
    /// The period date is present but not a recognized date.
    UnparseableDate(String),
    /// The invoice belongs to a month that was not requested.
    OutsideRequestedMonths(MonthKey),
    /// `native_subtotal` is absent or null.
    MissingSubtotal,
}

/// An invoice that was looked at and left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    /// Document number of the skipped invoice.
    pub number: String,
    /// Why it was left out.
    pub reason: SkipReason,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    months: Vec<MonthKey>,
    buckets: BTreeMap<MonthKey, MonthBucket>,
    skipped: Vec<Skipped>,
}

impl Aggregation {
    /// Requested months in the order they were requested.
    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    pub fn bucket(&self, month: MonthKey) -> Option<&MonthBucket> {
        self.buckets.get(&month)
    }

    /// Requested months with their buckets, in request order.
    pub fn iter(&self) -> impl Iterator<Item = (MonthKey, &MonthBucket)> {
        self.months
            .iter()
            .filter_map(|m| self.buckets.get(m).map(|b| (*m, b)))
    }

    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }
}

/// Bucket `invoices` into `months`.
///
/// A bucket exists for every requested month, even when nothing lands in
/// it. Invoices outside the requested months are dropped.
///
/// # Errors
///
/// [`FilingError::InvalidAmount`] if a counted invoice has a
/// `native_subtotal` that is not a decimal number, and
/// [`FilingError::AmountOverflow`] if a month total leaves the `Decimal`
/// range.
pub fn aggregate(
    invoices: &[InvoiceRecord],
    months: &[MonthKey],
    options: &AggregateOptions,
) -> Result<Aggregation, FilingError> {
    let mut buckets: BTreeMap<MonthKey, MonthBucket> = months
        .iter()
        .map(|m| (*m, MonthBucket::default()))
        .collect();
    let mut skipped = Vec::new();
    let exclude = options.exclude_country.trim().to_uppercase();

    for invoice in invoices {
        let month = match classify(invoice, &exclude, options.period_field) {
            Ok(month) => month,
            Err(reason) => {
                skip(&mut skipped, invoice, reason);
                continue;
            }
        };

        let Some(bucket) = buckets.get_mut(&month) else {
            skip(&mut skipped, invoice, SkipReason::OutsideRequestedMonths(month));
            continue;
        };

        let Some(raw) = invoice.native_subtotal.as_deref() else {
            skip(&mut skipped, invoice, SkipReason::MissingSubtotal);
            continue;
        };

        let amount = parse_amount(raw).ok_or_else(|| FilingError::InvalidAmount {
            number: invoice.number.clone(),
            value: raw.to_string(),
        })?;

        if !bucket.add(amount, JurisdictionPair::of(invoice), InvoiceDetail::of(invoice, raw)) {
            return Err(FilingError::AmountOverflow {
                number: invoice.number.clone(),
                month,
            });
        }
        tracing::debug!(number = %invoice.number, %month, %amount, "invoice counted");
    }

    Ok(Aggregation {
        months: months.to_vec(),
        buckets,
        skipped,
    })
}

/// The month `invoice` is reported in, or why it is not reported at all.
fn classify(
    invoice: &InvoiceRecord,
    exclude: &str,
    field: PeriodField,
) -> Result<MonthKey, SkipReason> {
    if invoice.document_type != DocumentType::Invoice {
        return Err(SkipReason::NotAnInvoice(invoice.document_type.to_string()));
    }
    if invoice.cancelled_at.as_deref().is_some_and(|s| !s.is_empty()) {
        return Err(SkipReason::Cancelled);
    }
    let country = invoice
        .client_country
        .as_deref()
        .unwrap_or("")
        .to_uppercase();
    if !exclude.is_empty() && country == exclude {
        return Err(SkipReason::ExcludedCountry);
    }
    match resolve_period_date(invoice, field) {
        Ok(date) => Ok(MonthKey::of(date)),
        Err(PeriodDateError::Missing) => Err(SkipReason::MissingPeriodDate),
        Err(PeriodDateError::Unparseable(raw)) => Err(SkipReason::UnparseableDate(raw)),
    }
}

fn skip(skipped: &mut Vec<Skipped>, invoice: &InvoiceRecord, reason: SkipReason) {
    if let SkipReason::NotAnInvoice(_) = &reason {
        if let DocumentType::Unrecognized(raw) = &invoice.document_type {
            tracing::warn!(number = %invoice.number, document_type = %raw, "unrecognized document type");
        }
    }
    tracing::debug!(number = %invoice.number, ?reason, "invoice skipped");
    skipped.push(Skipped {
        number: invoice.number.clone(),
        reason,
    });
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
