use criterion::{Criterion, black_box, criterion_group, criterion_main};

use souhrnka::core::*;

fn invoices(n: usize) -> Vec<InvoiceRecord> {
    (0..n)
        .map(|i| InvoiceRecord {
            number: format!("2024-{i:05}"),
            document_type: if i % 10 == 0 {
                DocumentType::Proforma
            } else {
                DocumentType::Invoice
            },
            client_country: Some(if i % 7 == 0 { "CZ" } else { "DE" }.into()),
            client_vat_no: Some("DE123456789".into()),
            native_subtotal: Some(format!("{}.{:02}", i * 13 % 5000, i % 100)),
            issued_on: Some(format!("2024-{:02}-{:02}", i % 6 + 1, i % 28 + 1)),
            ..Default::default()
        })
        .collect()
}

fn months() -> Vec<MonthKey> {
    month_list(MonthKey::new(2024, 6).unwrap(), 5)
}

fn bench_aggregate_1000(c: &mut Criterion) {
    let data = invoices(1000);
    let months = months();
    let options = AggregateOptions::default();
    c.bench_function("aggregate_1000_invoices_6_months", |b| {
        b.iter(|| black_box(aggregate(black_box(&data), &months, &options)));
    });
}

fn bench_plan_and_report(c: &mut Criterion) {
    let agg = aggregate(&invoices(1000), &months(), &AggregateOptions::default()).unwrap();
    c.bench_function("plan_filings", |b| {
        b.iter(|| black_box(plan_filings(black_box(&agg))));
    });
    c.bench_function("audit_report", |b| {
        b.iter(|| black_box(audit_report(black_box(&agg))));
    });
}

fn bench_parse_date(c: &mut Criterion) {
    c.bench_function("parse_date_plain", |b| {
        b.iter(|| black_box(parse_date(black_box("2024-03-15"))));
    });
    c.bench_function("parse_date_timestamp", |b| {
        b.iter(|| black_box(parse_date(black_box("2024-03-15T10:20:30+01:00"))));
    });
}

criterion_group!(
    benches,
    bench_aggregate_1000,
    bench_plan_and_report,
    bench_parse_date,
);
criterion_main!(benches);
