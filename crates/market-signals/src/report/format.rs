//! Line formatting helpers.

use rust_decimal::Decimal;

use crate::config::PriceFormat;

/// Arrow for the day's direction.
pub fn direction_marker(percent_change: Decimal) -> &'static str {
    if percent_change >= Decimal::ZERO { "📈" } else { "📉" }
}

pub fn format_change(percent_change: Decimal) -> String {
    format!("{percent_change:+.2}%")
}

pub fn format_price(value: Decimal, format: PriceFormat) -> String {
    match format {
        PriceFormat::Plain => format!("{value:.2}"),
        PriceFormat::Dollar => format!("${value:.2}"),
        PriceFormat::DollarWhole => format!("${}", group_thousands(value)),
    }
}

/// Whole-number rendering with comma separators, e.g. `97,512`.
pub fn group_thousands(value: Decimal) -> String {
    let rounded = value.round_dp(0);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}
