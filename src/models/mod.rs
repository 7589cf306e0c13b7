pub mod gstr2b;
pub mod purchase;
pub mod result;

pub use gstr2b::{parse_invoice_date, validate_records, Gstr2bRecordInput, RawAmount, TaxAuthorityRecord};
pub use purchase::PurchaseInvoice;
pub use result::{Differences, MatchStatus, Reconciliation, ReconciliationEntry, Summary};
