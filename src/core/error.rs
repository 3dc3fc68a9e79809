use thiserror::Error;

use super::months::MonthKey;
use super::types::JurisdictionPair;

/// Errors that abort a reporting run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FilingError {
    /// A required setting or credential is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The OAuth token exchange failed or returned no usable token.
    #[error("token exchange failed: {0}")]
    UpstreamAuth(String),

    /// Any other failure while talking to the invoicing API.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Jurisdiction data for a month cannot be reconciled.
    #[error(transparent)]
    DataConsistency(#[from] DataConsistencyError),

    /// `native_subtotal` is present but is not a decimal number.
    #[error("invoice {number}: native_subtotal '{value}' is not a decimal number")]
    InvalidAmount {
        /// Invoice number as reported upstream.
        number: String,
        /// The offending raw value.
        value: String,
    },

    /// Adding an invoice would push a month total out of the `Decimal` range.
    #[error("invoice {number}: {month} total exceeds the supported amount range")]
    AmountOverflow {
        /// Invoice whose amount could not be added.
        number: String,
        /// The month being summed.
        month: MonthKey,
    },

    /// A filing template is malformed or lacks an expected element.
    #[error("template error: {0}")]
    Template(String),

    /// Reading input or writing output files failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// A month with qualifying invoices whose counterparty cannot be determined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataConsistencyError {
    /// No invoice in the month carried a country or VAT number.
    #[error("Missing VAT/country for {month}. Please fix invoice data or fill SH manually.")]
    MissingJurisdiction {
        /// The affected month.
        month: MonthKey,
    },

    /// Invoices in the month name more than one counterparty.
    ///
    /// `pairs` is sorted. Splitting one month across several counterparties
    /// is not supported.
    #[error(
        "Found multiple VAT/country pairs for {month}: {}. This is not implemented.",
        format_pairs(.pairs)
    )]
    AmbiguousJurisdiction {
        /// The affected month.
        month: MonthKey,
        /// Every distinct pair observed, sorted.
        pairs: Vec<JurisdictionPair>,
    },
}

impl DataConsistencyError {
    /// The month the error refers to.
    pub fn month(&self) -> MonthKey {
        match self {
            Self::MissingJurisdiction { month } | Self::AmbiguousJurisdiction { month, .. } => {
                *month
            }
        }
    }
}

fn format_pairs(pairs: &[JurisdictionPair]) -> String {
    let items: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
    format!("[{}]", items.join(", "))
}

impl From<std::io::Error> for FilingError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
