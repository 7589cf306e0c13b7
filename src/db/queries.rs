use crate::models::PurchaseInvoice;
use chrono::NaiveDate;
use futures::TryStreamExt;
use sqlx::PgPool;

/// Purchase invoices with a vendor GSTIN for one user and period (newest first)
pub async fn list_purchase_invoices(
    pool: &PgPool,
    user_id: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<PurchaseInvoice>, sqlx::Error> {
    let start_time = std::time::Instant::now();

    let invoices: Vec<PurchaseInvoice> = sqlx::query_as::<_, PurchaseInvoice>(
        r#"
        SELECT id, vendor_gstin, invoice_number, invoice_date,
               taxable_value, tax_amount, grand_total
        FROM purchase_invoices
        WHERE user_id = $1
          AND vendor_gstin <> ''
          AND ($2::date IS NULL OR invoice_date >= $2)
          AND ($3::date IS NULL OR invoice_date <= $3)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch(pool)
    .try_collect()
    .await?;

    tracing::debug!(
        "Loaded {} purchase invoices for user {} in {:?}",
        invoices.len(),
        user_id,
        start_time.elapsed()
    );
    Ok(invoices)
}
