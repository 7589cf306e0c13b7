use super::{PurchaseInvoice, TaxAuthorityRecord};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Match state of a single reconciliation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "Exact Matched")]
    ExactMatched,
    #[serde(rename = "Partially Matched")]
    PartiallyMatched,
    #[serde(rename = "Missing in Purchase")]
    MissingInPurchase,
    #[serde(rename = "Missing in 2B")]
    MissingIn2B,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::ExactMatched,
        MatchStatus::PartiallyMatched,
        MatchStatus::MissingInPurchase,
        MatchStatus::MissingIn2B,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::ExactMatched => "Exact Matched",
            MatchStatus::PartiallyMatched => "Partially Matched",
            MatchStatus::MissingInPurchase => "Missing in Purchase",
            MatchStatus::MissingIn2B => "Missing in 2B",
        }
    }

    /// Case-insensitive lookup by display label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields that disagree on a partial match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Differences {
    pub taxable: bool,
    pub date: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationEntry {
    pub status: MatchStatus,
    pub purchase: Option<PurchaseInvoice>,
    pub gstr2b: Option<TaxAuthorityRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differences: Option<Differences>,
    /// 2B taxable minus purchase taxable, partial matches only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxable_difference: Option<BigDecimal>,
}

impl ReconciliationEntry {
    pub fn exact(purchase: PurchaseInvoice, record: TaxAuthorityRecord) -> Self {
        Self {
            status: MatchStatus::ExactMatched,
            purchase: Some(purchase),
            gstr2b: Some(record),
            differences: None,
            taxable_difference: None,
        }
    }

    pub fn partial(
        purchase: PurchaseInvoice,
        record: TaxAuthorityRecord,
        differences: Differences,
        taxable_difference: BigDecimal,
    ) -> Self {
        Self {
            status: MatchStatus::PartiallyMatched,
            purchase: Some(purchase),
            gstr2b: Some(record),
            differences: Some(differences),
            taxable_difference: Some(taxable_difference),
        }
    }

    pub fn missing_in_purchase(record: TaxAuthorityRecord) -> Self {
        Self {
            status: MatchStatus::MissingInPurchase,
            purchase: None,
            gstr2b: Some(record),
            differences: None,
            taxable_difference: None,
        }
    }

    pub fn missing_in_2b(purchase: PurchaseInvoice) -> Self {
        Self {
            status: MatchStatus::MissingIn2B,
            purchase: Some(purchase),
            gstr2b: None,
            differences: None,
            taxable_difference: None,
        }
    }
}

/// Per-status counts of one reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub exact_matched: usize,
    pub partially_matched: usize,
    pub missing_in_purchase: usize,
    #[serde(rename = "missingIn2B")]
    pub missing_in_2b: usize,
    pub total_records: usize,
}

impl Summary {
    pub fn from_entries(entries: &[ReconciliationEntry]) -> Self {
        let mut summary = Summary::default();
        for entry in entries {
            match entry.status {
                MatchStatus::ExactMatched => summary.exact_matched += 1,
                MatchStatus::PartiallyMatched => summary.partially_matched += 1,
                MatchStatus::MissingInPurchase => summary.missing_in_purchase += 1,
                MatchStatus::MissingIn2B => summary.missing_in_2b += 1,
            }
        }
        summary.total_records = entries.len();
        summary
    }
}

/// Classified diff plus its summary
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub entries: Vec<ReconciliationEntry>,
    pub summary: Summary,
}
