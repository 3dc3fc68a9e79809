//! Offline walk-through: aggregate a small invoice list, print the audit
//! report and fill the bundled templates in memory.
//!
//! Run with: `cargo run --example offline_report --features xml`

use souhrnka::core::*;
use souhrnka::template::*;

fn invoice(number: &str, country: &str, vat: &str, subtotal: &str, date: &str) -> InvoiceRecord {
    InvoiceRecord {
        number: number.into(),
        document_type: DocumentType::Invoice,
        client_country: Some(country.into()),
        client_vat_no: Some(vat.into()),
        native_subtotal: Some(subtotal.into()),
        issued_on: Some(date.into()),
        taxable_fulfillment_due: Some(date.into()),
        ..Default::default()
    }
}

fn main() -> Result<(), FilingError> {
    let source = StaticInvoices(vec![
        invoice("2024-0001", "DE", "DE123456789", "1000.00", "2024-03-05"),
        invoice("2024-0002", "DE", "DE123456789", "500.50", "2024-03-20"),
        invoice("2024-0003", "CZ", "CZ12345678", "8000.00", "2024-03-21"),
        invoice("2024-0004", "DE", "DE123456789", "0.40", "2024-02-11"),
    ]);
    let params = RunParams {
        target: MonthKey::new(2024, 3).unwrap(),
        months_back: 1,
        options: AggregateOptions::default(),
    };

    // ── 1. Audit report ───────────────────────────────────────────────
    println!("=== Audit Report ===");
    let agg = collect_month_data(&source, &params)?;
    print!("{}", audit_report(&agg));

    // ── 2. Filing decisions ───────────────────────────────────────────
    println!("=== Filings ===");
    let filer = FilerInfo {
        submit_date: "25.04.2024".into(),
        c_ufo: Some("451".into()),
        c_pracufo: Some("2001".into()),
    };
    for (month, outcome) in plan_filings(&agg)? {
        match outcome {
            FilingOutcome::File(filing) => {
                let dp3 = fill_dp3(include_str!("../templates/dphdp3.xml"), &filing, &filer)?;
                let sh = fill_sh(include_str!("../templates/dphshv.xml"), &filing, &filer)?;
                let (dp3_name, sh_name) = output_file_names("DEMO", month);
                println!("{month}: {dp3_name} ({} bytes), {sh_name} ({} bytes)", dp3.len(), sh.len());
            }
            FilingOutcome::ZeroTotal { count, total } => {
                println!("{month}: {count} invoice(s) totalling {total} round to 0, nothing to file");
            }
            FilingOutcome::NoInvoices => println!("{month}: no EU invoices"),
        }
    }
    Ok(())
}
