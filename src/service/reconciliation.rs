use super::engine::{self, TieBreak};
use super::store::PurchaseInvoiceStore;
use crate::error::AppError;
use crate::models::{validate_records, Gstr2bRecordInput, Reconciliation};
use chrono::NaiveDate;
use std::sync::Arc;

/// GSTR-2B reconciliation service: one persistence read, then the pure engine
pub struct ReconciliationService {
    store: Arc<dyn PurchaseInvoiceStore>,
    tie_break: TieBreak,
}

impl ReconciliationService {
    pub fn new(store: Arc<dyn PurchaseInvoiceStore>, tie_break: TieBreak) -> Self {
        Self { store, tie_break }
    }

    /// Reconcile a user's purchases in `[from, to]` against uploaded 2B rows.
    ///
    /// Read-only: on any error nothing is produced.
    pub async fn reconcile(
        &self,
        user_id: &str,
        inputs: &[Gstr2bRecordInput],
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Reconciliation, AppError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::Validation("userId is required".to_string()));
        }
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::Validation(format!(
                    "fromDate {} is after toDate {}",
                    from, to
                )));
            }
        }

        let records = validate_records(inputs)?;

        let purchases = self.store.list_for_period(user_id, from, to).await?;
        tracing::info!(
            "User {}: reconciling {} GSTR-2B records against {} purchase invoices",
            user_id,
            records.len(),
            purchases.len()
        );

        if records.is_empty() && purchases.is_empty() {
            return Err(AppError::NoOp(
                "No GSTR-2B records or purchase invoices found for the selected period".to_string(),
            ));
        }

        let result = engine::reconcile(&purchases, &records, self.tie_break);
        let s = &result.summary;
        tracing::info!(
            "User {}: exact {}, partial {}, missing in purchase {}, missing in 2B {}, total {}",
            user_id,
            s.exact_matched,
            s.partially_matched,
            s.missing_in_purchase,
            s.missing_in_2b,
            s.total_records
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, PurchaseInvoice, RawAmount};
    use crate::service::MemoryPurchaseInvoiceStore;
    use async_trait::async_trait;
    use bigdecimal::BigDecimal;

    struct BrokenStore;

    #[async_trait]
    impl PurchaseInvoiceStore for BrokenStore {
        async fn list_for_period(
            &self,
            _user_id: &str,
            _from: Option<NaiveDate>,
            _to: Option<NaiveDate>,
        ) -> Result<Vec<PurchaseInvoice>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    fn row(inv: &str, taxable: &str) -> Gstr2bRecordInput {
        Gstr2bRecordInput {
            gstin: "27AAAAA0000A1Z5".into(),
            inv_no: inv.into(),
            date: "2024-04-01".into(),
            taxable: Some(RawAmount::Text(taxable.into())),
            ..Default::default()
        }
    }

    async fn seeded() -> ReconciliationService {
        let store = MemoryPurchaseInvoiceStore::new();
        store
            .insert(
                "user-1",
                PurchaseInvoice {
                    id: 1,
                    vendor_gstin: "27AAAAA0000A1Z5".into(),
                    invoice_number: "INV-001".into(),
                    invoice_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                    taxable_value: BigDecimal::from(1000),
                    tax_amount: BigDecimal::from(180),
                    grand_total: BigDecimal::from(1180),
                },
            )
            .await;
        ReconciliationService::new(Arc::new(store), TieBreak::First)
    }

    #[tokio::test]
    async fn reconciles_against_stored_purchases() {
        let service = seeded().await;
        let result = service
            .reconcile("user-1", &[row("INV-001", "1000")], None, None)
            .await
            .unwrap();

        assert_eq!(result.entries[0].status, MatchStatus::ExactMatched);
        assert_eq!(result.summary.total_records, 1);
    }

    #[tokio::test]
    async fn store_failure_is_data_access_error() {
        let service = ReconciliationService::new(Arc::new(BrokenStore), TieBreak::First);
        let err = service
            .reconcile("user-1", &[row("INV-001", "1000")], None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DataAccess(_)));
    }

    #[tokio::test]
    async fn empty_on_both_sides_is_noop() {
        let service = seeded().await;
        let err = service
            .reconcile("someone-else", &[], None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NoOp(_)));
    }

    #[tokio::test]
    async fn bad_row_fails_before_reading_store() {
        let service = ReconciliationService::new(Arc::new(BrokenStore), TieBreak::First);
        let err = service
            .reconcile("user-1", &[row("INV-001", "ten")], None, None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Row 1: invalid taxable value 'ten'");
    }

    #[tokio::test]
    async fn inverted_period_is_rejected() {
        let service = seeded().await;
        let err = service
            .reconcile(
                "user-1",
                &[],
                NaiveDate::from_ymd_opt(2024, 5, 1),
                NaiveDate::from_ymd_opt(2024, 4, 1),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
