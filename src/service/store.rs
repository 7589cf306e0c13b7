use crate::models::PurchaseInvoice;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

/// Read access to a user's purchase invoices.
///
/// Implementations return invoices newest-created first; the engine's
/// `First` tie-break depends on that order.
#[async_trait]
pub trait PurchaseInvoiceStore: Send + Sync {
    /// Invoices with a vendor GSTIN whose date falls in the inclusive bounds.
    async fn list_for_period(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PurchaseInvoice>, sqlx::Error>;
}

/// In-memory store for tests and local runs
#[derive(Debug, Default)]
pub struct MemoryPurchaseInvoiceStore {
    invoices: RwLock<Vec<(String, PurchaseInvoice)>>,
}

impl MemoryPurchaseInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invoice as the newest one for `user_id`.
    pub async fn insert(&self, user_id: &str, invoice: PurchaseInvoice) {
        self.invoices
            .write()
            .await
            .insert(0, (user_id.to_string(), invoice));
    }
}

#[async_trait]
impl PurchaseInvoiceStore for MemoryPurchaseInvoiceStore {
    async fn list_for_period(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PurchaseInvoice>, sqlx::Error> {
        let invoices = self.invoices.read().await;
        Ok(invoices
            .iter()
            .filter(|(owner, inv)| {
                owner == user_id
                    && !inv.vendor_gstin.is_empty()
                    && from.map_or(true, |f| inv.invoice_date >= f)
                    && to.map_or(true, |t| inv.invoice_date <= t)
            })
            .map(|(_, inv)| inv.clone())
            .collect())
    }
}
