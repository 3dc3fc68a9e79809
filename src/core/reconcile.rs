use super::aggregate::MonthBucket;
use super::error::DataConsistencyError;
use super::months::MonthKey;
use super::types::JurisdictionPair;

/// The single counterparty of `bucket`.
///
/// Returns `Ok(None)` for a month without invoices, which needs no filing.
///
/// # Errors
///
/// [`DataConsistencyError::MissingJurisdiction`] when the counted invoices
/// carry no country or VAT number at all, and
/// [`DataConsistencyError::AmbiguousJurisdiction`] when they name more than
/// one counterparty.
pub fn reconcile(
    month: MonthKey,
    bucket: &MonthBucket,
) -> Result<Option<JurisdictionPair>, DataConsistencyError> {
    if bucket.is_empty() {
        return Ok(None);
    }
    let pairs = bucket.jurisdictions();
    match pairs.len() {
        0 => Err(DataConsistencyError::MissingJurisdiction { month }),
        1 => Ok(pairs.iter().next().cloned()),
        _ => Err(DataConsistencyError::AmbiguousJurisdiction {
            month,
            pairs: pairs.iter().cloned().collect(),
        }),
    }
}
