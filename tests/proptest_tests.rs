//! Property-based tests for rounding and month aggregation.
//!
//! Run with: `cargo test --features core --test proptest_tests`

#![cfg(feature = "core")]

use proptest::prelude::*;
use rust_decimal::Decimal;
use souhrnka::core::*;

fn march() -> MonthKey {
    MonthKey::new(2024, 3).unwrap()
}

/// Amounts with two decimal places, as Fakturoid returns them.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_country() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("DE"), Just("CZ"), Just("cz"), Just("SK"), Just("")]
}

fn arb_document_type() -> impl Strategy<Value = DocumentType> {
    prop_oneof![
        4 => Just(DocumentType::Invoice),
        1 => Just(DocumentType::Proforma),
        1 => Just(DocumentType::Correction),
        1 => Just(DocumentType::Unrecognized("estimate".into())),
    ]
}

fn arb_invoice(idx: usize) -> impl Strategy<Value = InvoiceRecord> {
    (
        arb_amount(),
        arb_country(),
        arb_document_type(),
        any::<bool>(),
        1u32..=28,
    )
        .prop_map(move |(amount, country, document_type, cancelled, day)| InvoiceRecord {
            number: format!("2024-{idx:04}"),
            document_type,
            cancelled_at: cancelled.then(|| "2024-03-29T08:00:00Z".to_string()),
            client_country: Some(country.to_string()),
            client_vat_no: Some(format!("{country}123")),
            native_subtotal: Some(amount.to_string()),
            issued_on: Some(format!("2024-03-{day:02}")),
            taxable_fulfillment_due: Some(format!("2024-03-{day:02}")),
        })
}

fn arb_invoices() -> impl Strategy<Value = Vec<InvoiceRecord>> {
    (1usize..25).prop_flat_map(|n| {
        (0..n).map(arb_invoice).collect::<Vec<_>>()
    })
}

fn counts(inv: &InvoiceRecord) -> bool {
    inv.document_type == DocumentType::Invoice
        && inv.cancelled_at.is_none()
        && !inv
            .client_country
            .as_deref()
            .unwrap_or("")
            .eq_ignore_ascii_case("CZ")
}

proptest! {
    #[test]
    fn rounding_stays_within_half(amount in arb_amount()) {
        let rounded = Decimal::from_i128_with_scale(round_half_up(amount), 0);
        prop_assert!((rounded - amount).abs() <= Decimal::new(5, 1));
    }

    #[test]
    fn rounding_ties_go_away_from_zero(n in -100_000i64..100_000i64) {
        let tie = Decimal::new(n * 10 + if n < 0 { -5 } else { 5 }, 1);
        let expected = if n < 0 { i128::from(n) - 1 } else { i128::from(n) + 1 };
        prop_assert_eq!(round_half_up(tie), expected);
    }

    #[test]
    fn bucket_total_is_exact_sum_of_counted(invoices in arb_invoices()) {
        let agg = aggregate(&invoices, &[march()], &AggregateOptions::default()).unwrap();
        let bucket = agg.bucket(march()).unwrap();

        let expected: Decimal = invoices
            .iter()
            .filter(|i| counts(i))
            .map(|i| i.native_subtotal.as_deref().unwrap().parse::<Decimal>().unwrap())
            .sum();
        prop_assert_eq!(bucket.total(), expected);
        prop_assert_eq!(bucket.count(), invoices.iter().filter(|i| counts(i)).count());
        prop_assert_eq!(bucket.count() + agg.skipped().len(), invoices.len());
    }

    #[test]
    fn excluded_records_never_change_the_total(
        invoices in arb_invoices(),
        noise in arb_invoices(),
    ) {
        let base = aggregate(&invoices, &[march()], &AggregateOptions::default()).unwrap();

        let mut mixed = invoices.clone();
        mixed.extend(noise.into_iter().filter(|i| !counts(i)));
        let with_noise = aggregate(&mixed, &[march()], &AggregateOptions::default()).unwrap();

        prop_assert_eq!(
            base.bucket(march()).unwrap().total(),
            with_noise.bucket(march()).unwrap().total()
        );
        prop_assert_eq!(
            base.bucket(march()).unwrap().count(),
            with_noise.bucket(march()).unwrap().count()
        );
    }

    #[test]
    fn filing_decision_matches_rounded_total(invoices in arb_invoices()) {
        let agg = aggregate(&invoices, &[march()], &AggregateOptions::default()).unwrap();
        let bucket = agg.bucket(march()).unwrap();
        if let Ok(outcome) = decide(march(), bucket) {
            match outcome {
                FilingOutcome::NoInvoices => prop_assert!(bucket.is_empty()),
                FilingOutcome::ZeroTotal { count, .. } => {
                    prop_assert_eq!(count, bucket.count());
                    prop_assert_eq!(round_half_up(bucket.total()), 0);
                }
                FilingOutcome::File(filing) => {
                    prop_assert_eq!(filing.total, round_half_up(bucket.total()));
                    prop_assert!(filing.total != 0);
                }
            }
        }
    }
}
