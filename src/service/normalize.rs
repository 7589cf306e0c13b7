use bigdecimal::BigDecimal;

/// Strip non-alphanumerics, lowercase, then drop leading zeros.
pub fn normalize_invoice_number(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    cleaned.trim_start_matches('0').to_string()
}

/// GSTIN is fixed-width and validated upstream, so only case is folded.
pub fn normalize_gstin(raw: &str) -> String {
    raw.to_uppercase()
}

pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.round(2)
}

/// Grouping key shared by purchase invoices and 2B records
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub gstin: String,
    pub invoice_number: String,
}

impl MatchKey {
    pub fn new(gstin: &str, invoice_number: &str) -> Self {
        Self {
            gstin: normalize_gstin(gstin),
            invoice_number: normalize_invoice_number(invoice_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn invoice_numbers_collapse_formatting() {
        assert_eq!(normalize_invoice_number("INV-001"), "inv001");
        assert_eq!(normalize_invoice_number("inv/001"), "inv001");
        assert_eq!(normalize_invoice_number("000123"), "123");
        assert_eq!(normalize_invoice_number(" 00-12 A "), "12a");
        assert_eq!(normalize_invoice_number("0000"), "");
    }

    #[test]
    fn invoice_number_normalization_is_idempotent() {
        for raw in ["INV-001", "0-0-7", "A/B/0C", "", "007bond"] {
            let once = normalize_invoice_number(raw);
            assert_eq!(normalize_invoice_number(&once), once);
        }
    }

    #[test]
    fn gstin_only_uppercases() {
        assert_eq!(normalize_gstin("27aaaaa0000a1z5"), "27AAAAA0000A1Z5");
        assert_eq!(normalize_gstin("27 aaa"), "27 AAA");
    }

    #[test]
    fn keys_match_across_formatting() {
        assert_eq!(
            MatchKey::new("27aaaaa0000a1z5", "INV-001"),
            MatchKey::new("27AAAAA0000A1Z5", "inv001")
        );
    }

    #[test]
    fn money_rounds_to_two_places() {
        let v = BigDecimal::from_str("1000.004").unwrap();
        assert_eq!(round_money(&v), BigDecimal::from_str("1000.00").unwrap());
    }
}
