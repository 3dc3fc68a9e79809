//! Per-month filing decisions.

use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::{Aggregation, MonthBucket};
use super::error::DataConsistencyError;
use super::months::MonthKey;
use super::reconcile::reconcile;
use super::rounding::round_half_up;
use super::types::JurisdictionPair;

/// Values written into the DP3 and SH statements for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filing {
    /// Reporting month (`VetaD@rok`, `VetaD@mesic`).
    pub month: MonthKey,
    /// Rounded total, used for both DP3 `pln_sluzby` and SH `pln_hodnota`.
    pub total: i128,
    /// Number of invoices behind the total (SH `pln_pocet`).
    pub count: usize,
    /// The month's single counterparty.
    pub jurisdiction: JurisdictionPair,
}

/// What happens with one reporting month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FilingOutcome {
    /// Produce the statements.
    File(Filing),
    /// No qualifying invoices in the month.
    NoInvoices,
    /// Invoices exist but their total rounds to zero.
    ZeroTotal { count: usize, total: Decimal },
}

impl FilingOutcome {
    pub fn filing(&self) -> Option<&Filing> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }
}

/// Decide the outcome for one month.
///
/// Jurisdiction is checked before the zero-total rule, so a month with
/// invoices but no usable counterparty is an error even if it sums to zero.
pub fn decide(month: MonthKey, bucket: &MonthBucket) -> Result<FilingOutcome, DataConsistencyError> {
    let jurisdiction = reconcile(month, bucket)?;
    let Some(jurisdiction) = jurisdiction else {
        return Ok(FilingOutcome::NoInvoices);
    };
    let total = round_half_up(bucket.total());
    if total == 0 {
        return Ok(FilingOutcome::ZeroTotal {
            count: bucket.count(),
            total: bucket.total(),
        });
    }
    Ok(FilingOutcome::File(Filing {
        month,
        total,
        count: bucket.count(),
        jurisdiction,
    }))
}

/// Decide every requested month, in request order.
///
/// Stops at the first inconsistent month: one bad month blocks the whole run.
pub fn plan_filings(
    aggregation: &Aggregation,
) -> Result<Vec<(MonthKey, FilingOutcome)>, DataConsistencyError> {
    aggregation
        .iter()
        .map(|(month, bucket)| {
            let outcome = decide(month, bucket)?;
            match &outcome {
                FilingOutcome::File(f) => {
                    tracing::info!(%month, total = %f.total, count = f.count, "month needs filing")
                }
                FilingOutcome::NoInvoices => tracing::info!(%month, "no EU invoices"),
                FilingOutcome::ZeroTotal { .. } => tracing::info!(%month, "total rounds to zero"),
            }
            Ok((month, outcome))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::{AggregateOptions, aggregate};
    use crate::core::types::{DocumentType, InvoiceRecord};
    use rust_decimal_macros::dec;

    fn m(month: u32) -> MonthKey {
        MonthKey::new(2024, month).unwrap()
    }

    fn inv(date: &str, country: &str, vat: &str, subtotal: &str) -> InvoiceRecord {
        InvoiceRecord {
            number: format!("{date}-{vat}"),
            document_type: DocumentType::Invoice,
            client_country: Some(country.into()),
            client_vat_no: Some(vat.into()),
            native_subtotal: Some(subtotal.into()),
            issued_on: Some(date.into()),
            ..Default::default()
        }
    }

    #[test]
    fn files_rounded_total() {
        let agg = aggregate(
            &[inv("2024-03-02", "SK", "SK1", "10.50")],
            &[m(3)],
            &AggregateOptions::default(),
        )
        .unwrap();
        let outcome = decide(m(3), agg.bucket(m(3)).unwrap()).unwrap();
        let filing = outcome.filing().unwrap();
        assert_eq!(filing.total, 11);
        assert_eq!(filing.count, 1);
        assert_eq!(filing.jurisdiction, JurisdictionPair::new("SK", "SK1"));
    }

    #[test]
    fn zero_total_differs_from_no_invoices() {
        let agg = aggregate(
            &[inv("2024-03-02", "SK", "SK1", "0.30"), inv("2024-03-03", "SK", "SK1", "0.10")],
            &[m(3), m(2)],
            &AggregateOptions::default(),
        )
        .unwrap();
        assert_eq!(
            decide(m(3), agg.bucket(m(3)).unwrap()).unwrap(),
            FilingOutcome::ZeroTotal {
                count: 2,
                total: dec!(0.40)
            }
        );
        assert_eq!(
            decide(m(2), agg.bucket(m(2)).unwrap()).unwrap(),
            FilingOutcome::NoInvoices
        );
    }

    #[test]
    fn ambiguity_beats_zero_total() {
        let agg = aggregate(
            &[inv("2024-03-02", "SK", "SK1", "0.10"), inv("2024-03-03", "AT", "ATU2", "0.10")],
            &[m(3)],
            &AggregateOptions::default(),
        )
        .unwrap();
        assert!(matches!(
            decide(m(3), agg.bucket(m(3)).unwrap()),
            Err(DataConsistencyError::AmbiguousJurisdiction { .. })
        ));
    }

    #[test]
    fn plan_halts_on_any_bad_month() {
        let agg = aggregate(
            &[
                inv("2024-03-02", "SK", "SK1", "100"),
                inv("2024-02-02", "SK", "SK1", "100"),
                inv("2024-02-03", "AT", "ATU2", "100"),
            ],
            &[m(3), m(2)],
            &AggregateOptions::default(),
        )
        .unwrap();
        let err = plan_filings(&agg).unwrap_err();
        assert_eq!(err.month(), m(2));
    }

    #[test]
    fn plan_keeps_request_order() {
        let agg = aggregate(
            &[inv("2024-02-02", "SK", "SK1", "100")],
            &[m(3), m(2), m(1)],
            &AggregateOptions::default(),
        )
        .unwrap();
        let plan = plan_filings(&agg).unwrap();
        let months: Vec<MonthKey> = plan.iter().map(|(k, _)| *k).collect();
        assert_eq!(months, vec![m(3), m(2), m(1)]);
        assert_eq!(plan[0].1, FilingOutcome::NoInvoices);
        assert!(plan[1].1.filing().is_some());
    }
}
