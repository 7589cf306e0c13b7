use crate::error::AppError;
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated tax-authority (GSTR-2B) invoice record. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxAuthorityRecord {
    pub gstin: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub taxable_value: BigDecimal,
    pub tax_amount: BigDecimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// Decimal places accepted on an amount. Negative means a positive exponent.
const AMOUNT_SCALE: std::ops::RangeInclusive<i64> = -15..=6;
/// Significant digits accepted on an amount.
const AMOUNT_MAX_DIGITS: usize = 20;

/// Monetary cell as it arrives on the wire: a JSON number or a string.
/// Anything else is kept so validation can name the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Number(n) => write!(f, "{}", n),
            RawAmount::Text(s) => write!(f, "{}", s),
            RawAmount::Other(v) => write!(f, "{}", v),
        }
    }
}

impl RawAmount {
    fn is_blank(&self) -> bool {
        matches!(self, RawAmount::Text(s) if s.trim().is_empty())
    }

    fn to_decimal(&self) -> Option<BigDecimal> {
        let text = match self {
            RawAmount::Number(n) => n.to_string(),
            // thousands separators from spreadsheet exports
            RawAmount::Text(s) => s.trim().replace(',', ""),
            RawAmount::Other(_) => return None,
        };
        let mantissa = text.split(['e', 'E']).next().unwrap_or("");
        if mantissa.chars().filter(char::is_ascii_digit).count() > AMOUNT_MAX_DIGITS {
            return None;
        }

        // every amount is rounded downstream; the scale must stay in the money range
        let value = BigDecimal::from_str(&text).ok()?;
        let (_, scale) = value.as_bigint_and_exponent();
        AMOUNT_SCALE.contains(&scale).then_some(value)
    }
}

/// Unvalidated GSTR-2B row, from a JSON request or a parsed CSV upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gstr2bRecordInput {
    #[serde(default)]
    pub gstin: String,
    #[serde(default, alias = "invoiceNumber")]
    pub inv_no: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub taxable: Option<RawAmount>,
    #[serde(default)]
    pub tax: Option<RawAmount>,
    #[serde(default)]
    pub igst: Option<RawAmount>,
    #[serde(default)]
    pub cgst: Option<RawAmount>,
    #[serde(default)]
    pub sgst: Option<RawAmount>,
    #[serde(default)]
    pub cess: Option<RawAmount>,
    #[serde(default)]
    pub section: Option<String>,
}

fn invalid(row: usize, field: &str, value: &str) -> AppError {
    AppError::Validation(format!("Row {}: invalid {} '{}'", row, field, value))
}

fn required_amount(row: usize, field: &str, raw: Option<&RawAmount>) -> Result<BigDecimal, AppError> {
    match raw {
        Some(amount) => amount
            .to_decimal()
            .ok_or_else(|| invalid(row, field, &amount.to_string())),
        None => Err(invalid(row, field, "")),
    }
}

/// Blank or absent components count as zero.
fn optional_amount(row: usize, field: &str, raw: Option<&RawAmount>) -> Result<Option<BigDecimal>, AppError> {
    match raw {
        Some(amount) if !amount.is_blank() => amount
            .to_decimal()
            .map(Some)
            .ok_or_else(|| invalid(row, field, &amount.to_string())),
        _ => Ok(None),
    }
}

/// Parse an invoice date in ISO or GSTR-2B export form.
pub fn parse_invoice_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for fmt in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

impl Gstr2bRecordInput {
    /// Validate into a record. `row` is 1-based and only used in error messages.
    pub fn validate(&self, row: usize) -> Result<TaxAuthorityRecord, AppError> {
        let gstin = self.gstin.trim();
        if gstin.is_empty() {
            return Err(invalid(row, "gstin", &self.gstin));
        }
        let invoice_number = self.inv_no.trim();
        if invoice_number.is_empty() {
            return Err(invalid(row, "invoice number", &self.inv_no));
        }
        let date = parse_invoice_date(&self.date).ok_or_else(|| invalid(row, "date", &self.date))?;
        let taxable_value = required_amount(row, "taxable value", self.taxable.as_ref())?;

        let tax_amount = match optional_amount(row, "tax", self.tax.as_ref())? {
            Some(tax) => tax,
            None => {
                let mut total = BigDecimal::zero();
                for (field, raw) in [
                    ("igst", &self.igst),
                    ("cgst", &self.cgst),
                    ("sgst", &self.sgst),
                    ("cess", &self.cess),
                ] {
                    if let Some(component) = optional_amount(row, field, raw.as_ref())? {
                        total += component;
                    }
                }
                total
            }
        };

        Ok(TaxAuthorityRecord {
            gstin: gstin.to_string(),
            invoice_number: invoice_number.to_string(),
            date,
            taxable_value,
            tax_amount,
            section: self
                .section
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Validate a whole upload; the first bad row fails it.
pub fn validate_records(inputs: &[Gstr2bRecordInput]) -> Result<Vec<TaxAuthorityRecord>, AppError> {
    inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| input.validate(idx + 1))
        .collect()
}
