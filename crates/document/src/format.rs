//! Text formatting for printed values.

use chrono::NaiveDate;
use rotulos_core::pricing::round_money;
use rust_decimal::Decimal;

/// Currency label printed before amounts. The built-in PDF fonts have no
/// colon sign glyph.
pub const CURRENCY: &str = "CRC";

/// Format money with thousands separators and two decimals: `1,234.50`.
pub fn money(value: Decimal) -> String {
    let rounded = round_money(value);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Money with the currency label: `CRC 1,234.50`.
pub fn currency(value: Decimal) -> String {
    format!("{CURRENCY} {}", money(value))
}

/// Quantity without trailing zeros: `2`, `2.5`.
pub fn quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Contract date as printed: `01/05/2024`.
pub fn date(value: NaiveDate) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Words longer than `width` are split. Blank input yields one empty line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        let word_len = chars.len();
        if word_len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
