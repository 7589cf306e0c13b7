use super::extract::{ApiJson, ApiQuery};
use crate::error::AppError;
use crate::models::{Gstr2bRecordInput, MatchStatus, ReconciliationEntry, Summary};
use crate::report::write_entries_csv;
use crate::service::ReconciliationService;
use crate::upload::parse_gstr2b_csv;
use axum::{
    extract::{Json, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body: 2B rows to reconcile against a user's purchases
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    pub user_id: String,
    #[serde(default)]
    pub records: Vec<Gstr2bRecordInput>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Query parameters for the CSV upload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvReconcileParams {
    pub user_id: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub data: Vec<ReconciliationEntry>,
    pub summary: Summary,
}

/// A previously computed result set, resubmitted by the client
#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub data: Vec<ReconciliationEntry>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterResponse {
    pub success: bool,
    pub data: Vec<ReconciliationEntry>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub data: Vec<ReconciliationEntry>,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// GSTR-2B reconciliation from JSON rows
pub async fn reconcile(
    State(service): State<Arc<ReconciliationService>>,
    ApiJson(req): ApiJson<ReconcileRequest>,
) -> Result<Json<ReconcileResponse>, AppError> {
    let result = service
        .reconcile(&req.user_id, &req.records, req.from_date, req.to_date)
        .await?;

    Ok(Json(ReconcileResponse {
        success: true,
        data: result.entries,
        summary: result.summary,
    }))
}

/// GSTR-2B reconciliation from a raw CSV export in the request body
pub async fn reconcile_csv(
    State(service): State<Arc<ReconciliationService>>,
    ApiQuery(params): ApiQuery<CsvReconcileParams>,
    body: String,
) -> Result<Json<ReconcileResponse>, AppError> {
    let rows = parse_gstr2b_csv(body.as_bytes())?;
    let result = service
        .reconcile(&params.user_id, &rows, params.from_date, params.to_date)
        .await?;

    Ok(Json(ReconcileResponse {
        success: true,
        data: result.entries,
        summary: result.summary,
    }))
}

/// Keep only entries with the requested status; absent or "All" keeps everything.
pub async fn filter_results(ApiJson(req): ApiJson<FilterRequest>) -> Result<Json<FilterResponse>, AppError> {
    let wanted = match req.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) if s.eq_ignore_ascii_case("all") => None,
        Some(s) => Some(
            MatchStatus::from_label(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", s)))?,
        ),
    };

    let data: Vec<ReconciliationEntry> = match wanted {
        Some(status) => req.data.into_iter().filter(|e| e.status == status).collect(),
        None => req.data,
    };

    Ok(Json(FilterResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Download a result set as CSV
pub async fn export_results(ApiJson(req): ApiJson<ExportRequest>) -> Result<Response, AppError> {
    let mut buf = Vec::new();
    write_entries_csv(&req.data, &mut buf).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"gstr2b-reconciliation.csv\"",
            ),
        ],
        buf,
    )
        .into_response())
}
