//! Fakturoid REST API access.
//!
//! # Example
//!
//! ```ignore
//! use souhrnka::fakturoid::*;
//! use souhrnka::core::*;
//!
//! let client = FakturoidClient::connect(&Credentials {
//!     client_id: "...".into(),
//!     client_secret: "...".into(),
//!     user_agent: "souhrnka (ops@example.com)".into(),
//! }, None)?;
//! let window = FetchWindow::covering(&month_list(target, 2)).unwrap();
//! let invoices = client.fetch_invoices(&window)?;
//! ```

mod client;

pub use client::{
    API_BASE, Credentials, FakturoidClient, PAGE_SIZE, invoices_url, is_last_page,
    parse_account_slug, parse_invoice_page, parse_token_response,
};
