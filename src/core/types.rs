use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::FilingError;

/// One invoice as returned by the Fakturoid `invoices.json` endpoint.
///
/// Only the fields the monthly statements need are modelled; everything
/// else in the API payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Document number, e.g. "2024-0042". Empty when the API sends none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub number: String,
    /// Only [`DocumentType::Invoice`] is counted.
    #[serde(default)]
    pub document_type: DocumentType,
    /// Set when the invoice was cancelled (storno).
    #[serde(default)]
    pub cancelled_at: Option<String>,
    /// ISO 3166-1 alpha-2 code of the client.
    #[serde(default)]
    pub client_country: Option<String>,
    /// Client VAT number as typed into the invoice.
    #[serde(default)]
    pub client_vat_no: Option<String>,
    /// Amount without VAT in the account's native currency, as decimal text.
    #[serde(default, deserialize_with = "amount_text")]
    pub native_subtotal: Option<String>,
    /// Issue date (`YYYY-MM-DD`).
    #[serde(default)]
    pub issued_on: Option<String>,
    /// Tax point date (DUZP).
    #[serde(default)]
    pub taxable_fulfillment_due: Option<String>,
}

/// Fakturoid document types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentType {
    /// Regular invoice; the only type that counts.
    Invoice,
    /// Proforma (advance) invoice.
    Proforma,
    /// Proforma for a partial advance payment.
    PartialProforma,
    /// Corrective tax document (opravný daňový doklad).
    Correction,
    /// Tax document for a received payment.
    TaxDocument,
    /// Final invoice settling earlier advances.
    FinalInvoice,
    /// A value this crate does not know. Never counted.
    Unrecognized(String),
}

impl DocumentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Invoice => "invoice",
            Self::Proforma => "proforma",
            Self::PartialProforma => "partial_proforma",
            Self::Correction => "correction",
            Self::TaxDocument => "tax_document",
            Self::FinalInvoice => "final_invoice",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<String> for DocumentType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "invoice" => Self::Invoice,
            "proforma" => Self::Proforma,
            "partial_proforma" => Self::PartialProforma,
            "correction" => Self::Correction,
            "tax_document" => Self::TaxDocument,
            "final_invoice" => Self::FinalInvoice,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<DocumentType> for String {
    fn from(t: DocumentType) -> Self {
        match t {
            DocumentType::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which invoice date decides the reporting month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PeriodField {
    /// Tax point date (DUZP), falling back to the issue date.
    #[default]
    TaxableFulfillmentDue,
    /// Issue date.
    IssuedOn,
}

impl PeriodField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaxableFulfillmentDue => "taxable_fulfillment_due",
            Self::IssuedOn => "issued_on",
        }
    }

    /// Raw value of this field on `invoice`.
    pub fn value<'a>(&self, invoice: &'a InvoiceRecord) -> Option<&'a str> {
        match self {
            Self::TaxableFulfillmentDue => invoice.taxable_fulfillment_due.as_deref(),
            Self::IssuedOn => invoice.issued_on.as_deref(),
        }
    }
}

impl FromStr for PeriodField {
    type Err = FilingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "taxable_fulfillment_due" => Ok(Self::TaxableFulfillmentDue),
            "issued_on" => Ok(Self::IssuedOn),
            other => Err(FilingError::Configuration(format!(
                "unknown period field '{other}', expected taxable_fulfillment_due or issued_on"
            ))),
        }
    }
}

impl fmt::Display for PeriodField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counterparty identity for the recapitulative statement.
///
/// Both parts are normalized: the country is trimmed and uppercased, the
/// VAT number is uppercased with all whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct JurisdictionPair {
    /// Country code, trimmed and uppercased (SH `k_stat`).
    pub country: String,
    /// VAT number, uppercased without whitespace (SH `c_vat`).
    pub vat: String,
}

impl JurisdictionPair {
    pub fn new(country: &str, vat: &str) -> Self {
        Self {
            country: country.trim().to_uppercase(),
            vat: vat
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase(),
        }
    }

    /// Pair for `invoice`, or `None` when it has neither country nor VAT.
    pub fn of(invoice: &InvoiceRecord) -> Option<Self> {
        let pair = Self::new(
            invoice.client_country.as_deref().unwrap_or(""),
            invoice.client_vat_no.as_deref().unwrap_or(""),
        );
        (!pair.country.is_empty() || !pair.vat.is_empty()).then_some(pair)
    }
}

impl fmt::Display for JurisdictionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.country, self.vat)
    }
}

/// Audit line for one invoice counted into a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceDetail {
    /// Document number.
    pub number: String,
    /// Issue date as received.
    pub issued_on: Option<String>,
    /// Tax point date as received.
    pub taxable_fulfillment_due: Option<String>,
    /// Client country as received, not normalized.
    pub client_country: Option<String>,
    /// Client VAT number as received, not normalized.
    pub client_vat_no: Option<String>,
    /// Amount text that was added to the month total.
    pub native_subtotal: String,
}

impl InvoiceDetail {
    pub(crate) fn of(invoice: &InvoiceRecord, subtotal: &str) -> Self {
        Self {
            number: invoice.number.clone(),
            issued_on: invoice.issued_on.clone(),
            taxable_fulfillment_due: invoice.taxable_fulfillment_due.clone(),
            client_country: invoice.client_country.clone(),
            client_vat_no: invoice.client_vat_no.clone(),
            native_subtotal: subtotal.to_string(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `native_subtotal` as a JSON string or number and keeps its text.
fn amount_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount as string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, d: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}
