//! Display formatting for amounts in the active currency.

use daybook_domain::CurrencyCode;

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "NGN" => "₦".into(),
        "JPY" => "¥".into(),
        "CNY" => "CN¥".into(),
        "INR" => "₹".into(),
        "CAD" => "CA$".into(),
        "AUD" => "A$".into(),
        "CHF" => "CHF ".into(),
        _ => format!("{code} "),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn currency_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "USD" => "US Dollar",
        "EUR" => "Euro",
        "GBP" => "British Pound",
        "NGN" => "Nigerian Naira",
        "JPY" => "Japanese Yen",
        "CAD" => "Canadian Dollar",
        "AUD" => "Australian Dollar",
        "CHF" => "Swiss Franc",
        "CNY" => "Chinese Yuan",
        "INR" => "Indian Rupee",
        _ => return None,
    };
    Some(name)
}

/// Fixed-precision number with `,` thousands grouping.
pub fn format_number(value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (sign, unsigned) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body.as_str()),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(pos) => unsigned.split_at(pos),
        None => (unsigned, ""),
    };
    format!("{sign}{}{frac_part}", group_digits(int_part, ','))
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Symbol, grouping and the currency's minor units, e.g. `-$1,234.50`.
pub fn format_amount(amount: f64, code: &CurrencyCode) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(amount.abs(), precision);
    let negative = amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    format!("{sign}{}{body}", symbol_for(code.as_str()))
}
