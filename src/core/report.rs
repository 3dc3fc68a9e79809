//! Human-readable audit report, checked by hand before anything is filed.

use std::fmt::Write;

use super::aggregate::{Aggregation, MonthBucket};
use super::months::MonthKey;
use super::rounding::round_half_up;

/// Render the audit report for every requested month, in request order.
pub fn audit_report(aggregation: &Aggregation) -> String {
    let mut out = String::new();
    for (month, bucket) in aggregation.iter() {
        write_month(&mut out, month, bucket);
    }
    out
}

fn write_month(out: &mut String, month: MonthKey, bucket: &MonthBucket) {
    let rounded = round_half_up(bucket.total());
    // writing into a String cannot fail
    let _ = writeln!(
        out,
        "{month}  count={}  sum_native_subtotal={}  sum_rounded={rounded}",
        bucket.count(),
        bucket.total()
    );
    for d in bucket.details() {
        let _ = writeln!(
            out,
            "   - {}  native_subtotal={}  country={}  vat={}  issued={}  taxable={}",
            d.number,
            d.native_subtotal,
            or_dash(&d.client_country),
            or_dash(&d.client_vat_no),
            or_dash(&d.issued_on),
            or_dash(&d.taxable_fulfillment_due),
        );
    }
    if bucket.is_empty() {
        out.push_str("   -> no EU invoices for this month (likely no SH/DP3 line to fill)\n");
    } else {
        let _ = writeln!(
            out,
            "   -> use for XML: DP3(pln_sluzby)={rounded}  SH(pln_hodnota)={rounded}  pln_pocet={}",
            bucket.count()
        );
    }
    out.push('\n');
}

fn or_dash(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}
