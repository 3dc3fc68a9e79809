//! Decoding Fakturoid API payloads.
//!
//! No network access; the HTTP layer is exercised only through the pure
//! response parsers.
//!
//! Run with: `cargo test --features client --test client_tests`

#![cfg(feature = "client")]

use souhrnka::core::*;
use souhrnka::fakturoid::*;

const PAGE: &str = r#"[
  {
    "id": 27,
    "custom_id": null,
    "document_type": "invoice",
    "number": "2024-0042",
    "status": "paid",
    "issued_on": "2024-03-28",
    "taxable_fulfillment_due": "2024-03-31",
    "cancelled_at": null,
    "client_name": "Beispiel GmbH",
    "client_country": "DE",
    "client_vat_no": "DE123456789",
    "currency": "EUR",
    "exchange_rate": "25.12",
    "subtotal": "400.0",
    "native_subtotal": "10048.0",
    "total": "400.0",
    "lines": [{"name": "Consulting", "quantity": "8.0", "unit_price": "50.0"}]
  },
  {
    "document_type": "proforma",
    "number": "P-2024-0007",
    "issued_on": "2024-03-02",
    "client_country": "SK",
    "client_vat_no": "SK2020202020",
    "native_subtotal": 1200.5
  },
  {
    "document_type": "estimate",
    "number": "E-1",
    "issued_on": "2024-03-03",
    "native_subtotal": null
  }
]"#;

#[test]
fn invoice_page_fields() {
    let page = parse_invoice_page(PAGE).unwrap();
    assert_eq!(page.len(), 3);

    let first = &page[0];
    assert_eq!(first.number, "2024-0042");
    assert_eq!(first.document_type, DocumentType::Invoice);
    assert!(first.cancelled_at.is_none());
    assert_eq!(first.client_country.as_deref(), Some("DE"));
    assert_eq!(first.native_subtotal.as_deref(), Some("10048.0"));
    assert_eq!(first.taxable_fulfillment_due.as_deref(), Some("2024-03-31"));
}

#[test]
fn numeric_subtotal_is_kept_as_text() {
    let page = parse_invoice_page(PAGE).unwrap();
    assert_eq!(page[1].document_type, DocumentType::Proforma);
    assert_eq!(page[1].native_subtotal.as_deref(), Some("1200.5"));
}

#[test]
fn unknown_document_type_is_preserved() {
    let page = parse_invoice_page(PAGE).unwrap();
    assert_eq!(
        page[2].document_type,
        DocumentType::Unrecognized("estimate".into())
    );
    assert!(page[2].native_subtotal.is_none());
}

#[test]
fn decoded_page_aggregates() {
    let page = parse_invoice_page(PAGE).unwrap();
    let march = MonthKey::new(2024, 3).unwrap();
    let agg = aggregate(&page, &[march], &AggregateOptions::default()).unwrap();
    let bucket = agg.bucket(march).unwrap();
    assert_eq!(bucket.count(), 1);
    assert_eq!(round_half_up(bucket.total()), 10048);
    assert_eq!(agg.skipped().len(), 2);
}

#[test]
fn null_number_does_not_reject_page() {
    let body = r#"[
      {"document_type": "invoice", "number": null, "issued_on": "2024-03-04", "native_subtotal": "10.0"},
      {"document_type": "invoice", "issued_on": "2024-03-05", "native_subtotal": "20.0"}
    ]"#;
    let page = parse_invoice_page(body).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].number, "");
    assert_eq!(page[1].number, "");
    assert_eq!(page[0].native_subtotal.as_deref(), Some("10.0"));
}

#[test]
fn short_page_ends_listing() {
    let page = parse_invoice_page(PAGE).unwrap();
    assert!(is_last_page(page.len()));
    assert!(!is_last_page(PAGE_SIZE));
}

#[test]
fn default_account_preferred() {
    let body = r#"{
      "id": 5,
      "full_name": "Jan Novák",
      "default_account": "novak",
      "accounts": [{"slug": "other", "name": "Other s.r.o."}, {"slug": "novak", "name": "Jan Novák"}]
    }"#;
    assert_eq!(parse_account_slug(body).unwrap(), "novak");
}

#[test]
fn first_account_when_no_default() {
    let body = r#"{"default_account": null, "accounts": [{"slug": "first"}, {"slug": "second"}]}"#;
    assert_eq!(parse_account_slug(body).unwrap(), "first");
}

#[test]
fn no_accounts_is_error() {
    let err = parse_account_slug(r#"{"accounts": []}"#).unwrap_err();
    assert!(matches!(err, FilingError::Upstream(_)));
    assert!(err.to_string().contains("No accounts found"));
}

#[test]
fn token_error_is_auth_failure() {
    let err = parse_token_response(r#"{"error": "invalid_grant"}"#).unwrap_err();
    assert!(matches!(err, FilingError::UpstreamAuth(_)));
}
