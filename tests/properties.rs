//! Property-based checks of the reconciliation engine.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use gstr2b_reconcile::models::{MatchStatus, PurchaseInvoice, TaxAuthorityRecord};
use gstr2b_reconcile::service::{normalize_invoice_number, reconcile, TieBreak};
use proptest::prelude::*;
use std::collections::HashMap;

// Small alphabets so keys collide often.
const GSTINS: [&str; 2] = ["27AAAAA0000A1Z5", "27aaaaa0000a1z5"];
const INVOICES: [&str; 4] = ["INV-001", "inv/1", "INV-002", "0002"];
const AMOUNTS: [i64; 3] = [100000, 100050, 50000];

fn money(cents: i64) -> BigDecimal {
    BigDecimal::new(cents.into(), 2)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
}

fn purchase_strategy() -> impl Strategy<Value = (usize, usize, u32, usize)> {
    (0..GSTINS.len(), 0..INVOICES.len(), 1u32..3, 0..AMOUNTS.len())
}

fn purchases_from(shapes: &[(usize, usize, u32, usize)]) -> Vec<PurchaseInvoice> {
    shapes
        .iter()
        .enumerate()
        .map(|(id, &(g, i, d, a))| PurchaseInvoice {
            id: id as i64,
            vendor_gstin: GSTINS[g].to_string(),
            invoice_number: INVOICES[i].to_string(),
            invoice_date: day(d),
            taxable_value: money(AMOUNTS[a]),
            tax_amount: money(AMOUNTS[a] * 18 / 100),
            grand_total: money(AMOUNTS[a] * 118 / 100),
        })
        .collect()
}

fn records_from(shapes: &[(usize, usize, u32, usize)]) -> Vec<TaxAuthorityRecord> {
    shapes
        .iter()
        .map(|&(g, i, d, a)| TaxAuthorityRecord {
            gstin: GSTINS[g].to_string(),
            invoice_number: INVOICES[i].to_string(),
            date: day(d),
            taxable_value: money(AMOUNTS[a]),
            tax_amount: money(AMOUNTS[a] * 18 / 100),
            section: None,
        })
        .collect()
}

fn tie_break_strategy() -> impl Strategy<Value = TieBreak> {
    prop_oneof![Just(TieBreak::First), Just(TieBreak::Closest)]
}

proptest! {
    #[test]
    fn every_record_lands_in_exactly_one_entry(
        p in prop::collection::vec(purchase_strategy(), 0..12),
        r in prop::collection::vec(purchase_strategy(), 0..12),
        tie_break in tie_break_strategy(),
    ) {
        let purchases = purchases_from(&p);
        let records = records_from(&r);
        let result = reconcile(&purchases, &records, tie_break);

        // one entry per 2B record, in input order
        for (idx, record) in records.iter().enumerate() {
            prop_assert_eq!(result.entries[idx].gstr2b.as_ref(), Some(record));
        }
        prop_assert!(result.entries[records.len()..].iter().all(|e| e.gstr2b.is_none()));

        // every purchase exactly once: no double consumption, nothing dropped
        let mut seen: HashMap<i64, usize> = HashMap::new();
        for entry in &result.entries {
            if let Some(p) = &entry.purchase {
                *seen.entry(p.id).or_default() += 1;
            }
        }
        prop_assert_eq!(seen.len(), purchases.len());
        prop_assert!(seen.values().all(|&n| n == 1));

        let s = result.summary;
        let unmatched = result.entries.iter().filter(|e| e.status == MatchStatus::MissingIn2B).count();
        prop_assert_eq!(
            s.exact_matched + s.partially_matched + s.missing_in_purchase + s.missing_in_2b,
            s.total_records
        );
        prop_assert_eq!(s.total_records, records.len() + unmatched);
        prop_assert_eq!(s.total_records, result.entries.len());
    }

    #[test]
    fn identical_pair_is_always_exact(
        shape in purchase_strategy(),
        tie_break in tie_break_strategy(),
    ) {
        let purchases = purchases_from(&[shape]);
        let records = records_from(&[shape]);
        let result = reconcile(&purchases, &records, tie_break);

        prop_assert_eq!(result.entries.len(), 1);
        prop_assert_eq!(result.entries[0].status, MatchStatus::ExactMatched);
    }

    #[test]
    fn invoice_number_normalization_is_idempotent(raw in "\\PC{0,24}") {
        let once = normalize_invoice_number(&raw);
        prop_assert_eq!(normalize_invoice_number(&once), once);
    }
}
