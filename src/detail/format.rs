use crate::attributes::{is_truthy, stringify};

use chrono::NaiveDate;
use serde_json::Value;

pub const NOT_INFORMED: &str = "Não informado";

pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim().trim_start_matches("R$").trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(v) = text.parse::<f64>() {
        return Some(v);
    }
    text.replace('.', "").replace(',', ".").parse::<f64>().ok()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// `R$ 1.234,56`: comma before the cents, dots between thousands. `None` when
/// the amount in cents does not fit a `u64`.
pub fn format_brl(amount: f64) -> Option<String> {
    let scaled = (amount.abs() * 100.0).round();
    if !scaled.is_finite() || scaled >= u64::MAX as f64 {
        return None;
    }
    let cents = scaled as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    Some(format!(
        "{}R$ {},{:02}",
        sign,
        group_thousands(&(cents / 100).to_string()),
        cents % 100
    ))
}

pub fn format_currency(value: Option<&Value>) -> String {
    let value = match value {
        Some(v) if is_truthy(v) => v,
        _ => return NOT_INFORMED.to_owned(),
    };

    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    };

    match amount {
        Some(a) if a == 0.0 => NOT_INFORMED.to_owned(),
        Some(a) => format_brl(a).unwrap_or_else(|| stringify(value)),
        None => stringify(value),
    }
}

/// `YYYY-MM-DD...` becomes `DD/MM/YYYY`; anything else passes through.
pub fn format_date(text: &str) -> String {
    let prefix = match text.get(..10) {
        Some(p) => p,
        None => return text.to_owned(),
    };
    let shape_ok = prefix.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return text.to_owned();
    }

    match NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => text.to_owned(),
    }
}

pub fn format_date_value(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(v) => format_date(stringify(v).trim()),
        _ => NOT_INFORMED.to_owned(),
    }
}

pub fn format_percent(value: Option<&Value>) -> String {
    let ratio = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim().trim_end_matches('%').trim();
            s.parse::<f64>()
                .ok()
                .or_else(|| s.replace(',', ".").parse::<f64>().ok())
        }
        _ => None,
    }
    .filter(|v| v.is_finite())
    .unwrap_or(0.0);

    format!("{:.1}%", ratio).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_currency() {
        assert_eq!("R$ 1.234,56", format_currency(Some(&json!(1234.56))));
        assert_eq!("R$ 1.000.000,00", format_currency(Some(&json!(1000000))));
        assert_eq!("R$ 12,30", format_currency(Some(&json!("12.3"))));
        assert_eq!("R$ 2.500,75", format_currency(Some(&json!("R$ 2.500,75"))));
        assert_eq!("-R$ 5,00", format_currency(Some(&json!(-5))));
    }

    #[test]
    fn test_currency_fallbacks() {
        assert_eq!(NOT_INFORMED, format_currency(None));
        assert_eq!(NOT_INFORMED, format_currency(Some(&json!(0))));
        assert_eq!(NOT_INFORMED, format_currency(Some(&json!("0,00"))));
        assert_eq!(NOT_INFORMED, format_currency(Some(&json!(""))));
        assert_eq!("a definir", format_currency(Some(&json!("a definir"))));
    }

    #[test]
    fn test_currency_out_of_range() {
        assert_eq!("1e300", format_currency(Some(&json!("1e300"))));
        assert_eq!(None, format_brl(2.0e17));
        assert_eq!(Some("R$ 1.000.000.000.000,00".to_owned()), format_brl(1.0e12));
    }

    #[test]
    fn test_format_date() {
        assert_eq!("10/05/2022", format_date("2022-05-10"));
        assert_eq!("01/12/2021", format_date("2021-12-01T13:45:00Z"));
        assert_eq!("10/05/2022", format_date("10/05/2022"));
        assert_eq!("2022-5-1", format_date("2022-5-1"));
        assert_eq!("2022-13-45", format_date("2022-13-45"));
        assert_eq!("", format_date(""));
        assert_eq!(NOT_INFORMED, format_date_value(None));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!("45,5%", format_percent(Some(&json!(45.52))));
        assert_eq!("100,0%", format_percent(Some(&json!("100"))));
        assert_eq!("12,5%", format_percent(Some(&json!("12,5%"))));
        assert_eq!("0,0%", format_percent(None));
        assert_eq!("0,0%", format_percent(Some(&json!("n/a"))));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!("1", group_thousands("1"));
        assert_eq!("123", group_thousands("123"));
        assert_eq!("1.234", group_thousands("1234"));
        assert_eq!("123.456.789", group_thousands("123456789"));
    }
}
