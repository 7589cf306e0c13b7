use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Locally stored purchase invoice (purchase_invoices)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInvoice {
    pub id: i64,
    pub vendor_gstin: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub taxable_value: BigDecimal,
    pub tax_amount: BigDecimal,
    pub grand_total: BigDecimal,
}
