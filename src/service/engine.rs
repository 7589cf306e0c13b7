use super::normalize::{round_money, MatchKey};
use crate::models::{
    Differences, PurchaseInvoice, Reconciliation, ReconciliationEntry, Summary, TaxAuthorityRecord,
};
use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which candidate a 2B record falls back to when nothing matches exactly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// First remaining candidate in purchase order (newest first).
    #[default]
    First,
    /// Remaining candidate with the smallest taxable difference; earliest wins ties.
    Closest,
}

impl TieBreak {
    fn pick(
        &self,
        candidates: &[usize],
        purchases: &[PurchaseInvoice],
        taxable: &BigDecimal,
    ) -> Option<usize> {
        match self {
            TieBreak::First => candidates.first().copied(),
            TieBreak::Closest => candidates.iter().copied().min_by(|&a, &b| {
                let da = (round_money(&purchases[a].taxable_value) - taxable).abs();
                let db = (round_money(&purchases[b].taxable_value) - taxable).abs();
                da.cmp(&db)
            }),
        }
    }
}

/// Candidate index: purchase positions grouped by match key, in purchase order.
fn build_index(purchases: &[PurchaseInvoice]) -> IndexMap<MatchKey, Vec<usize>> {
    let mut index: IndexMap<MatchKey, Vec<usize>> = IndexMap::new();
    for (idx, purchase) in purchases.iter().enumerate() {
        index
            .entry(MatchKey::new(&purchase.vendor_gstin, &purchase.invoice_number))
            .or_default()
            .push(idx);
    }
    index
}

/// Classify every 2B record and every purchase invoice into exactly one entry.
///
/// Entries come out as one per record in input order, followed by the unconsumed
/// purchases (Missing in 2B) in purchase order. A purchase is consumed by the first
/// record that matches it, exactly or partially, and is never offered again.
pub fn reconcile(
    purchases: &[PurchaseInvoice],
    records: &[TaxAuthorityRecord],
    tie_break: TieBreak,
) -> Reconciliation {
    let index = build_index(purchases);
    let mut consumed = vec![false; purchases.len()];
    let mut entries = Vec::with_capacity(records.len() + purchases.len());

    for record in records {
        let key = MatchKey::new(&record.gstin, &record.invoice_number);
        let candidates: Vec<usize> = index
            .get(&key)
            .map(|ids| ids.iter().copied().filter(|&i| !consumed[i]).collect())
            .unwrap_or_default();

        let taxable = round_money(&record.taxable_value);

        let exact = candidates.iter().copied().find(|&i| {
            let p = &purchases[i];
            round_money(&p.taxable_value) == taxable && p.invoice_date == record.date
        });
        if let Some(idx) = exact {
            consumed[idx] = true;
            entries.push(ReconciliationEntry::exact(purchases[idx].clone(), record.clone()));
            continue;
        }

        let Some(idx) = tie_break.pick(&candidates, purchases, &taxable) else {
            entries.push(ReconciliationEntry::missing_in_purchase(record.clone()));
            continue;
        };

        consumed[idx] = true;
        let purchase = &purchases[idx];
        let purchase_taxable = round_money(&purchase.taxable_value);
        let differences = Differences {
            taxable: purchase_taxable != taxable,
            date: purchase.invoice_date != record.date,
        };
        entries.push(ReconciliationEntry::partial(
            purchase.clone(),
            record.clone(),
            differences,
            round_money(&(&taxable - &purchase_taxable)),
        ));
    }

    for (idx, purchase) in purchases.iter().enumerate() {
        if !consumed[idx] {
            entries.push(ReconciliationEntry::missing_in_2b(purchase.clone()));
        }
    }

    let summary = Summary::from_entries(&entries);
    tracing::debug!(
        "Reconciled {} records against {} purchases: {:?}",
        records.len(),
        purchases.len(),
        summary
    );

    Reconciliation { entries, summary }
}
