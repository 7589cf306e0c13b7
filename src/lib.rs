pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod service;
pub mod upload;

pub use config::AppConfig;
pub use db::{create_pool, PgPurchaseInvoiceStore};
pub use error::AppError;
pub use service::{MemoryPurchaseInvoiceStore, PurchaseInvoiceStore, ReconciliationService, TieBreak};
