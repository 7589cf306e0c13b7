//! GSTR-2B CSV import.
//!
//! Turns a CSV export of the 2B statement into unvalidated rows. Field validation
//! happens later, in the same place as JSON input.

use crate::error::AppError;
use crate::models::{Gstr2bRecordInput, RawAmount};
use std::io::Read;

/// Accepted header spellings, compared after `header_key`.
const GSTIN: &[&str] = &["gstin", "gstinofsupplier", "suppliergstin"];
const INVOICE_NUMBER: &[&str] = &["invoicenumber", "invoiceno", "invno"];
const DATE: &[&str] = &["invoicedate", "date"];
const TAXABLE: &[&str] = &["taxablevalue", "taxable"];
const TAX: &[&str] = &["tax", "totaltax"];
const IGST: &[&str] = &["igst", "integratedtax"];
const CGST: &[&str] = &["cgst", "centraltax"];
const SGST: &[&str] = &["sgst", "stateuttax", "sgstutgst"];
const CESS: &[&str] = &["cess"];
const SECTION: &[&str] = &["section"];

fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

struct Columns {
    gstin: usize,
    invoice_number: usize,
    date: usize,
    taxable: usize,
    tax: Option<usize>,
    igst: Option<usize>,
    cgst: Option<usize>,
    sgst: Option<usize>,
    cess: Option<usize>,
    section: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, AppError> {
        let keys: Vec<String> = headers.iter().map(header_key).collect();
        let find = |names: &[&str]| keys.iter().position(|k| names.iter().any(|name| *name == k.as_str()));
        let require = |names: &[&str], label: &str| {
            find(names).ok_or_else(|| {
                AppError::Validation(format!("Missing required column '{}'", label))
            })
        };

        Ok(Self {
            gstin: require(GSTIN, "GSTIN")?,
            invoice_number: require(INVOICE_NUMBER, "Invoice Number")?,
            date: require(DATE, "Invoice Date")?,
            taxable: require(TAXABLE, "Taxable Value")?,
            tax: find(TAX),
            igst: find(IGST),
            cgst: find(CGST),
            sgst: find(SGST),
            cess: find(CESS),
            section: find(SECTION),
        })
    }
}

fn cell(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").trim().to_string()
}

fn amount(record: &csv::StringRecord, idx: Option<usize>) -> Option<RawAmount> {
    let value = cell(record, idx?);
    (!value.is_empty()).then_some(RawAmount::Text(value))
}

/// Parse a headed GSTR-2B CSV. Blank rows are skipped.
pub fn parse_gstr2b_csv<R: Read>(reader: R) -> Result<Vec<Gstr2bRecordInput>, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::Validation(format!("Malformed CSV: {}", e)))?
        .clone();
    let columns = Columns::locate(&headers)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| AppError::Validation(format!("Malformed CSV: {}", e)))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        rows.push(Gstr2bRecordInput {
            gstin: cell(&record, columns.gstin),
            inv_no: cell(&record, columns.invoice_number),
            date: cell(&record, columns.date),
            // a blank taxable cell is kept so validation reports the row
            taxable: Some(RawAmount::Text(cell(&record, columns.taxable))),
            tax: amount(&record, columns.tax),
            igst: amount(&record, columns.igst),
            cgst: amount(&record, columns.cgst),
            sgst: amount(&record, columns.sgst),
            cess: amount(&record, columns.cess),
            section: columns
                .section
                .map(|idx| cell(&record, idx))
                .filter(|s| !s.is_empty()),
        });
    }

    tracing::debug!("Parsed {} GSTR-2B rows from CSV", rows.len());
    Ok(rows)
}
