use super::error::FilingError;
use super::months::FetchWindow;
use super::types::InvoiceRecord;

/// Something that can list invoices for a time window.
///
/// The HTTP client implements this against the Fakturoid API; tests and
/// offline runs use [`StaticInvoices`].
pub trait InvoiceSource {
    /// All invoices (any document type) in `window`, pagination flattened.
    fn fetch_invoices(&self, window: &FetchWindow) -> Result<Vec<InvoiceRecord>, FilingError>;
}

/// A fixed invoice list, e.g. loaded from a JSON dump.
///
/// Ignores the window; the aggregator drops whatever falls outside the
/// requested months anyway.
#[derive(Debug, Clone, Default)]
pub struct StaticInvoices(pub Vec<InvoiceRecord>);

impl InvoiceSource for StaticInvoices {
    fn fetch_invoices(&self, _window: &FetchWindow) -> Result<Vec<InvoiceRecord>, FilingError> {
        Ok(self.0.clone())
    }
}
