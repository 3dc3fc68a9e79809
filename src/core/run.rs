use super::aggregate::{AggregateOptions, Aggregation, aggregate};
use super::error::FilingError;
use super::months::{FetchWindow, MonthKey, month_list};
use super::source::InvoiceSource;

/// What a reporting run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    /// Newest month to report.
    pub target: MonthKey,
    /// How many months before `target` to include.
    pub months_back: u32,
    pub options: AggregateOptions,
}

impl RunParams {
    /// Requested months, newest first.
    pub fn months(&self) -> Vec<MonthKey> {
        month_list(self.target, self.months_back)
    }
}

/// Fetch once for the whole range and bucket the result.
pub fn collect_month_data(
    source: &dyn InvoiceSource,
    params: &RunParams,
) -> Result<Aggregation, FilingError> {
    let months = params.months();
    let window = FetchWindow::covering(&months)
        .ok_or_else(|| FilingError::Configuration(
            "requested months are outside the supported date range".into(),
        ))?;

    tracing::info!(
        since = %window.since_param(),
        until = %window.until_param(),
        months = months.len(),
        "fetching invoices"
    );
    let invoices = source.fetch_invoices(&window)?;
    tracing::info!(count = invoices.len(), "invoices fetched");

    let aggregation = aggregate(&invoices, &months, &params.options)?;
    tracing::info!(skipped = aggregation.skipped().len(), "aggregation done");
    Ok(aggregation)
}
