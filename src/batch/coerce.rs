//! Coercion of loosely-typed spreadsheet cells.
//!
//! Rows come from spreadsheets, so a salary may arrive as a JSON number, a
//! plain numeric string or a Brazilian currency string ("R$ 1.234,56").

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::GroupKey;

/// Parses a decimal from plain ("1234.56") or Brazilian ("R$ 1.234,56")
/// notation.
///
/// A comma marks Brazilian notation: dots are thousand separators and the
/// comma is the decimal separator. Without a comma, text grouped in threes
/// after the first dot ("3.000", "R$ 1.250.000") is read as whole reais.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let unprefixed = trimmed.strip_prefix("R$").unwrap_or(trimmed);
    let compact: String = unprefixed.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = if compact.contains(',') {
        compact.replace('.', "").replace(',', ".")
    } else if is_thousands_grouped(&compact) {
        compact.replace('.', "")
    } else {
        compact
    };

    parse_plain(&normalized)
}

fn parse_plain(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Matches `d{1,3}(.ddd)+` with an optional leading minus.
fn is_thousands_grouped(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut parts = digits.split('.');
    let head_ok = parts
        .next()
        .is_some_and(|head| (1..=3).contains(&head.len()) && head.bytes().all(|b| b.is_ascii_digit()));
    let mut groups = 0;
    for part in parts {
        if part.len() != 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        groups += 1;
    }
    head_ok && groups > 0
}

/// Returns a cell's numeric value, if it has one.
pub fn numeric_value(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        // JSON numbers are never in Brazilian notation
        Value::Number(n) => parse_plain(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Coerces a salary cell, rejecting blanks, non-numbers and negatives.
///
/// The error is the human-readable reason recorded for the skipped row.
pub fn coerce_salary(value: Option<&Value>) -> Result<Decimal, String> {
    let salary = match value {
        None | Some(Value::Null) => return Err("salary is empty".to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err("salary is empty".to_string());
        }
        Some(cell) => {
            numeric_value(Some(cell)).ok_or_else(|| format!("salary {} is not a number", cell))?
        }
    };

    if salary < Decimal::ZERO {
        return Err(format!("salary must not be negative, got {}", salary));
    }
    Ok(salary)
}

/// Keys a group cell by its exact text; null, blank and absent cells are
/// [`GroupKey::Ungrouped`].
pub fn group_key(value: Option<&Value>) -> GroupKey {
    match value {
        None | Some(Value::Null) => GroupKey::Ungrouped,
        Some(Value::String(s)) if s.trim().is_empty() => GroupKey::Ungrouped,
        Some(Value::String(s)) => GroupKey::Named(s.clone()),
        Some(other) => GroupKey::Named(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain_decimal() {
        assert_eq!(parse_decimal("3000"), Some(dec("3000")));
        assert_eq!(parse_decimal(" 4500.75 "), Some(dec("4500.75")));
        assert_eq!(parse_decimal("-1"), Some(dec("-1")));
    }

    #[test]
    fn test_parse_brazilian_currency() {
        assert_eq!(parse_decimal("R$ 1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_decimal("R$3.000,00"), Some(dec("3000")));
        assert_eq!(parse_decimal("123,45"), Some(dec("123.45")));
        assert_eq!(parse_decimal("600.822.115,84"), Some(dec("600822115.84")));
    }

    #[test]
    fn test_parse_brazilian_currency_without_cents() {
        assert_eq!(parse_decimal("R$ 3.000"), Some(dec("3000")));
        assert_eq!(parse_decimal("3.500"), Some(dec("3500")));
        assert_eq!(parse_decimal("R$ 1.250.000"), Some(dec("1250000")));
        assert_eq!(parse_decimal("-2.000"), Some(dec("-2000")));
    }

    #[test]
    fn test_parse_dot_decimals_outside_thousands_pattern() {
        assert_eq!(parse_decimal("3.5"), Some(dec("3.5")));
        assert_eq!(parse_decimal("1234.567"), Some(dec("1234.567")));
        assert_eq!(parse_decimal("R$ 3000.50"), Some(dec("3000.50")));
        assert_eq!(parse_decimal("3.000.5"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("R$"), None);
        assert_eq!(parse_decimal("três mil"), None);
    }

    #[test]
    fn test_coerce_salary_from_json_number() {
        assert_eq!(coerce_salary(Some(&json!(3000))), Ok(dec("3000")));
        assert_eq!(coerce_salary(Some(&json!(3000.5))), Ok(dec("3000.5")));
        assert_eq!(coerce_salary(Some(&json!(1.125))), Ok(dec("1.125")));
    }

    #[test]
    fn test_coerce_salary_from_string() {
        assert_eq!(coerce_salary(Some(&json!("5000"))), Ok(dec("5000")));
        assert_eq!(coerce_salary(Some(&json!("R$ 5.000,00"))), Ok(dec("5000")));
    }

    #[test]
    fn test_coerce_salary_rejects_negative() {
        let err = coerce_salary(Some(&json!(-1))).unwrap_err();
        assert!(err.contains("negative"));
    }

    #[test]
    fn test_coerce_salary_rejects_blank_and_non_numeric() {
        assert!(coerce_salary(None).unwrap_err().contains("empty"));
        assert!(coerce_salary(Some(&Value::Null)).unwrap_err().contains("empty"));
        assert!(coerce_salary(Some(&json!("  "))).unwrap_err().contains("empty"));
        assert!(coerce_salary(Some(&json!("abc"))).unwrap_err().contains("not a number"));
        assert!(coerce_salary(Some(&json!(true))).unwrap_err().contains("not a number"));
    }

    #[test]
    fn test_group_key_stringifies_exactly() {
        assert_eq!(group_key(Some(&json!("Eng"))), GroupKey::named("Eng"));
        assert_eq!(group_key(Some(&json!("eng"))), GroupKey::named("eng"));
        assert_eq!(group_key(Some(&json!(42))), GroupKey::named("42"));
        assert_eq!(group_key(Some(&json!(false))), GroupKey::named("false"));
    }

    #[test]
    fn test_group_key_collects_blank_cells() {
        assert_eq!(group_key(None), GroupKey::Ungrouped);
        assert_eq!(group_key(Some(&Value::Null)), GroupKey::Ungrouped);
        assert_eq!(group_key(Some(&json!(""))), GroupKey::Ungrouped);
    }

    #[test]
    fn test_group_key_text_matching_ungrouped_label_stays_named() {
        assert_eq!(group_key(Some(&json!("(sem grupo)"))), GroupKey::named("(sem grupo)"));
    }
}
