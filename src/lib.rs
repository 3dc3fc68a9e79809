//! # souhrnka
//!
//! Monthly Czech VAT filings for EU service sales invoiced in Fakturoid:
//! the summary VAT return (DP3, `DPHDP3`) and the recapitulative statement
//! (SH, `DPHSHV`).
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Totals are rounded to whole crowns half-up only at the very end.
//!
//! ## Quick Start
//!
//! ```rust
//! use souhrnka::core::*;
//!
//! let march = MonthKey::new(2024, 3).unwrap();
//! let invoices = vec![InvoiceRecord {
//!     number: "2024-0001".into(),
//!     document_type: DocumentType::Invoice,
//!     client_country: Some("DE".into()),
//!     client_vat_no: Some("DE123".into()),
//!     native_subtotal: Some("1500.50".into()),
//!     issued_on: Some("2024-03-05".into()),
//!     ..Default::default()
//! }];
//!
//! let agg = aggregate(&invoices, &[march], &AggregateOptions::default()).unwrap();
//! let plan = plan_filings(&agg).unwrap();
//! assert_eq!(plan[0].1.filing().unwrap().total, 1501);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Aggregation, reconciliation, rounding, audit report |
//! | `xml` | DP3 / SH template filling |
//! | `client` | Blocking Fakturoid API v3 client |
//! | `cli` (default) | The `souhrnka` binary and env configuration |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod template;

#[cfg(feature = "client")]
pub mod fakturoid;

#[cfg(feature = "cli")]
pub mod config;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
