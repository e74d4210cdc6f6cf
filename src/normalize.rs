//! Field normalization for legacy export values
//!
//! Masking helpers (tax id, phones, postal code) never fail: a value that does
//! not have the expected number of digits is passed through unchanged.
//! Structured parses (dates, decimals, integers) fall back to `None` instead.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::parser::Scalar;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

/// Non-empty value, or `None` for missing/falsy input
fn present(raw: Option<&Scalar>) -> Option<&Scalar> {
    raw.filter(|v| v.is_truthy())
}

fn digits(raw: &Scalar) -> String {
    NON_DIGITS.replace_all(&raw.as_text(), "").into_owned()
}

/// Format a CNPJ as `DD.DDD.DDD/DDDD-DD`
pub fn format_tax_id(raw: Option<&Scalar>) -> Option<String> {
    let raw = present(raw)?;
    let d = digits(raw);

    if d.len() != 14 {
        return Some(raw.to_string());
    }

    Some(format!(
        "{}.{}.{}/{}-{}",
        &d[..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..]
    ))
}

/// Format a landline or mobile number (10 or 11 digits)
pub fn format_phone(raw: Option<&Scalar>) -> Option<String> {
    let raw = present(raw)?;
    let d = digits(raw);

    match d.len() {
        10 => Some(format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..])),
        11 => Some(format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..])),
        _ => Some(raw.to_string()),
    }
}

/// Format a mobile number; only 11-digit values are masked
pub fn format_mobile(raw: Option<&Scalar>) -> Option<String> {
    let raw = present(raw)?;
    let d = digits(raw);

    if d.len() == 11 {
        Some(format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]))
    } else {
        Some(raw.to_string())
    }
}

/// Format a CEP as `DDDDD-DDD`
pub fn format_postal_code(raw: Option<&Scalar>) -> Option<String> {
    let raw = present(raw)?;
    let d = digits(raw);

    if d.len() == 8 {
        Some(format!("{}-{}", &d[..5], &d[5..]))
    } else {
        Some(raw.to_string())
    }
}

/// Split `"CITY/UF"` into its parts
///
/// Without a slash the whole value is the city. With several slashes the
/// state is the segment between the first and the second one; the rest is
/// dropped.
pub fn split_city_state(raw: Option<&Scalar>) -> (Option<String>, Option<String>) {
    let Some(raw) = present(raw) else {
        return (None, None);
    };

    let text = raw.as_text();
    let value = text.trim();

    let mut parts = value.split('/');
    let city = parts.next().unwrap_or_default().trim().to_string();
    let state = parts.next().map(|s| s.trim().to_string());

    (Some(city), state)
}

/// Parse a `YYYY-MM-DD` date, ignoring anything from the first `T` onwards
pub fn parse_date(raw: Option<&Scalar>) -> Option<NaiveDate> {
    let text = present(raw)?.as_str()?;
    let day = text.split('T').next().unwrap_or(text);

    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Parse a decimal amount from the string form of the value
///
/// Zero is a valid amount, so only a missing value short-circuits here.
pub fn parse_decimal(raw: Option<&Scalar>) -> Option<Decimal> {
    let raw = raw?;
    if let Scalar::Bool(_) = raw {
        return None;
    }

    let text = raw.as_text();
    let value = text.trim();

    Decimal::from_str_exact(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

/// Parse a whole number from an integral JSON number or a digit string
pub fn parse_integer(raw: Option<&Scalar>) -> Option<i64> {
    match raw? {
        Scalar::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Scalar::Text(s) => i64::from_str(s.trim()).ok(),
        Scalar::Bool(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Scalar {
        Scalar::from(value)
    }

    #[test]
    fn test_format_tax_id() {
        assert_eq!(
            format_tax_id(Some(&s("12345678000190"))).as_deref(),
            Some("12.345.678/0001-90")
        );
        assert_eq!(
            format_tax_id(Some(&s("12 345 678-0001 90"))).as_deref(),
            Some("12.345.678/0001-90")
        );
        assert_eq!(
            format_tax_id(Some(&Scalar::from(12345678000190))).as_deref(),
            Some("12.345.678/0001-90")
        );
    }

    #[test]
    fn test_format_tax_id_keeps_raw_value_on_wrong_length() {
        assert_eq!(format_tax_id(Some(&s("12.345"))).as_deref(), Some("12.345"));
        assert_eq!(
            format_tax_id(Some(&s("123456780001901"))).as_deref(),
            Some("123456780001901")
        );
        assert_eq!(format_tax_id(Some(&s("n/a"))).as_deref(), Some("n/a"));
        assert_eq!(format_tax_id(Some(&s(""))), None);
        assert_eq!(format_tax_id(None), None);
    }

    #[test]
    fn test_format_tax_id_is_stable_on_formatted_input() {
        let formatted = format_tax_id(Some(&s("12345678000190"))).unwrap();
        assert_eq!(
            format_tax_id(Some(&s(&formatted))).as_deref(),
            Some(formatted.as_str())
        );
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(
            format_phone(Some(&s("9232345678"))).as_deref(),
            Some("(92) 3234-5678")
        );
        assert_eq!(
            format_phone(Some(&s("92 98123-4567"))).as_deref(),
            Some("(92) 98123-4567")
        );
        assert_eq!(format_phone(Some(&s("3234-5678"))).as_deref(), Some("3234-5678"));
        assert_eq!(format_phone(Some(&s(""))), None);
        assert_eq!(format_phone(None), None);
    }

    #[test]
    fn test_format_phone_idempotent() {
        for raw in ["9232345678", "92981234567"] {
            let once = format_phone(Some(&s(raw))).unwrap();
            let twice = format_phone(Some(&s(&once))).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_format_mobile() {
        assert_eq!(
            format_mobile(Some(&s("92981234567"))).as_deref(),
            Some("(92) 98123-4567")
        );
        assert_eq!(
            format_mobile(Some(&s("9232345678"))).as_deref(),
            Some("9232345678")
        );

        let once = format_mobile(Some(&s("92981234567"))).unwrap();
        assert_eq!(format_mobile(Some(&s(&once))).as_deref(), Some(once.as_str()));
        assert_eq!(format_mobile(None), None);
    }

    #[test]
    fn test_format_postal_code() {
        assert_eq!(
            format_postal_code(Some(&s("69000123"))).as_deref(),
            Some("69000-123")
        );
        assert_eq!(
            format_postal_code(Some(&s("69.000-123"))).as_deref(),
            Some("69000-123")
        );
        assert_eq!(format_postal_code(Some(&s("6900"))).as_deref(), Some("6900"));
        assert_eq!(format_postal_code(Some(&s(""))), None);
    }

    #[test]
    fn test_split_city_state() {
        assert_eq!(
            split_city_state(Some(&s("MANAUS/AM"))),
            (Some("MANAUS".to_string()), Some("AM".to_string()))
        );
        assert_eq!(
            split_city_state(Some(&s("  MANAUS / AM "))),
            (Some("MANAUS".to_string()), Some("AM".to_string()))
        );
        assert_eq!(
            split_city_state(Some(&s("MANAUS"))),
            (Some("MANAUS".to_string()), None)
        );
        assert_eq!(
            split_city_state(Some(&s("A/B/C"))),
            (Some("A".to_string()), Some("B".to_string()))
        );
        assert_eq!(
            split_city_state(Some(&s("MANAUS/AM/BR"))),
            (Some("MANAUS".to_string()), Some("AM".to_string()))
        );
        assert_eq!(split_city_state(None), (None, None));
        assert_eq!(split_city_state(Some(&s(""))), (None, None));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(Some(&s("2024-05-10T00:00:00"))),
            NaiveDate::from_ymd_opt(2024, 5, 10)
        );
        assert_eq!(
            parse_date(Some(&s("1987-12-01"))),
            NaiveDate::from_ymd_opt(1987, 12, 1)
        );
        assert_eq!(parse_date(Some(&s("not-a-date"))), None);
        assert_eq!(parse_date(Some(&s("2024-02-30"))), None);
        assert_eq!(parse_date(Some(&Scalar::from(20240510))), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(
            parse_decimal(Some(&s("150.50"))),
            Some(Decimal::from_str("150.50").unwrap())
        );
        assert_eq!(parse_decimal(Some(&Scalar::from(0))), Some(Decimal::ZERO));
        assert_eq!(
            parse_decimal(Some(&s("1e3"))),
            Some(Decimal::from(1000))
        );
        assert_eq!(parse_decimal(Some(&s("R$ 10"))), None);
        assert_eq!(parse_decimal(Some(&Scalar::from(true))), None);
        assert_eq!(parse_decimal(None), None);
    }

    #[test]
    fn test_parse_integer() {
        let values: Vec<Scalar> = serde_json::from_str(r#"[12, 12.0, " 7 ", 1.5, "x"]"#).unwrap();
        let parsed: Vec<Option<i64>> = values.iter().map(|v| parse_integer(Some(v))).collect();
        assert_eq!(parsed, vec![Some(12), Some(12), Some(7), None, None]);
    }
}
