use crate::models::ReconciliationEntry;
use bigdecimal::BigDecimal;
use std::io::Write;

const HEADER: [&str; 12] = [
    "Status",
    "GSTIN",
    "Invoice Number",
    "2B Date",
    "2B Taxable Value",
    "2B Tax",
    "Purchase Id",
    "Purchase Date",
    "Purchase Taxable Value",
    "Purchase Tax",
    "Taxable Differs",
    "Date Differs",
];

fn option_to_csv(val: Option<&BigDecimal>) -> String {
    val.map(|v| v.to_string()).unwrap_or_default()
}

/// Export reconciliation entries as CSV; a missing side leaves its cells empty.
pub fn write_entries_csv<W: Write>(entries: &[ReconciliationEntry], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;

    for entry in entries {
        let record = entry.gstr2b.as_ref();
        let purchase = entry.purchase.as_ref();
        let gstin = record
            .map(|r| r.gstin.clone())
            .or_else(|| purchase.map(|p| p.vendor_gstin.clone()))
            .unwrap_or_default();
        let invoice_number = record
            .map(|r| r.invoice_number.clone())
            .or_else(|| purchase.map(|p| p.invoice_number.clone()))
            .unwrap_or_default();
        let (taxable_differs, date_differs) = match entry.differences {
            Some(d) => (d.taxable.to_string(), d.date.to_string()),
            None => (String::new(), String::new()),
        };

        writer.write_record([
            entry.status.label().to_string(),
            gstin,
            invoice_number,
            record.map(|r| r.date.to_string()).unwrap_or_default(),
            option_to_csv(record.map(|r| &r.taxable_value)),
            option_to_csv(record.map(|r| &r.tax_amount)),
            purchase.map(|p| p.id.to_string()).unwrap_or_default(),
            purchase.map(|p| p.invoice_date.to_string()).unwrap_or_default(),
            option_to_csv(purchase.map(|p| &p.taxable_value)),
            option_to_csv(purchase.map(|p| &p.tax_amount)),
            taxable_differs,
            date_differs,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Differences, PurchaseInvoice, TaxAuthorityRecord};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn purchase() -> PurchaseInvoice {
        PurchaseInvoice {
            id: 42,
            vendor_gstin: "27AAAAA0000A1Z5".into(),
            invoice_number: "INV-001".into(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            taxable_value: BigDecimal::from_str("1000.50").unwrap(),
            tax_amount: BigDecimal::from(180),
            grand_total: BigDecimal::from_str("1180.50").unwrap(),
        }
    }

    fn record() -> TaxAuthorityRecord {
        TaxAuthorityRecord {
            gstin: "27AAAAA0000A1Z5".into(),
            invoice_number: "INV001".into(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            taxable_value: BigDecimal::from_str("1000.00").unwrap(),
            tax_amount: BigDecimal::from(180),
            section: None,
        }
    }

    #[test]
    fn writes_both_sides_and_blanks() {
        let entries = vec![
            ReconciliationEntry::partial(
                purchase(),
                record(),
                Differences {
                    taxable: true,
                    date: false,
                },
                BigDecimal::from_str("-0.50").unwrap(),
            ),
            ReconciliationEntry::missing_in_2b(purchase()),
        ];

        let mut buf = Vec::new();
        write_entries_csv(&entries, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Status,GSTIN,Invoice Number"));
        assert_eq!(
            lines[1],
            "Partially Matched,27AAAAA0000A1Z5,INV001,2024-04-01,1000.00,180,42,2024-04-01,1000.50,180,true,false"
        );
        assert_eq!(
            lines[2],
            "Missing in 2B,27AAAAA0000A1Z5,INV-001,,,,42,2024-04-01,1000.50,180,,"
        );
    }
}
