use gstr2b_reconcile::{api, create_pool, AppConfig, PgPurchaseInvoiceStore, ReconciliationService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::load()?;
    info!(
        "Starting server with config: server={:?}, database={}, max_connections={}, tie_break={:?}",
        config.server,
        config.redacted_database_url(),
        config.database.max_connections,
        config.reconcile.tie_break
    );

    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let store = Arc::new(PgPurchaseInvoiceStore::new(pool));
    let service = Arc::new(ReconciliationService::new(store, config.reconcile.tie_break));
    let app = api::router(service);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/gstr2b/reconcile      - reconcile JSON 2B rows");
    info!("  POST /api/gstr2b/reconcile/csv  - reconcile a 2B CSV export");
    info!("  POST /api/gstr2b/filter         - filter a result set by status");
    info!("  POST /api/gstr2b/export         - download a result set as CSV");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
