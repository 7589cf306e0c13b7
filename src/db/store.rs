use super::queries;
use crate::models::PurchaseInvoice;
use crate::service::PurchaseInvoiceStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

/// PostgreSQL-backed purchase invoice store
#[derive(Clone)]
pub struct PgPurchaseInvoiceStore {
    pool: PgPool,
}

impl PgPurchaseInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseInvoiceStore for PgPurchaseInvoiceStore {
    async fn list_for_period(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PurchaseInvoice>, sqlx::Error> {
        queries::list_purchase_invoices(&self.pool, user_id, from, to).await
    }
}
