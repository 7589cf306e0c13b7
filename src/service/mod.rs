pub mod engine;
pub mod normalize;
pub mod reconciliation;
pub mod store;

pub use engine::{reconcile, TieBreak};
pub use normalize::{normalize_gstin, normalize_invoice_number, MatchKey};
pub use reconciliation::ReconciliationService;
pub use store::{MemoryPurchaseInvoiceStore, PurchaseInvoiceStore};
