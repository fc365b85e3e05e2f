//! Formatting of computed values for display.

/// Format a dollar amount as whole US dollars, e.g. `$1,234,568`.
///
/// Rounds half away from zero.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }

    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}", sign, grouped)
}

/// Format a percentage with one decimal place.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
