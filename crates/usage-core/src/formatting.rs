/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use usage_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact decimal midpoints (1.005) round up
    // despite their binary representation sitting just below.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let int_str = integer_part.to_string();
    let grouped = group_thousands(&int_str);

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0.", e.g. "0.50".
        let decimal_digits = &frac_str[1..];
        format!("{}{}", grouped, decimal_digits)
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a call count with thousands separators.
///
/// ```
/// use usage_core::formatting::format_count;
///
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Round `value` to `decimal_places`, half away from zero.
///
/// ```
/// use usage_core::formatting::round_to;
///
/// assert_eq!(round_to(6.254, 2), 6.25);
/// assert_eq!(round_to(33.3333, 2), 33.33);
/// ```
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

/// Format a utilization percentage for display: `"6.25%"`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value, 2))
}

/// Format a relative change with an explicit sign: `"+12.50%"`, `"-3.00%"`.
///
/// ```
/// use usage_core::formatting::format_signed_percent;
///
/// assert_eq!(format_signed_percent(12.5), "+12.50%");
/// assert_eq!(format_signed_percent(-3.0), "-3.00%");
/// assert_eq!(format_signed_percent(0.0), "0.00%");
/// ```
pub fn format_signed_percent(value: f64) -> String {
    format!("{}%", signed(value))
}

/// Format a percentage-point difference: `"+1.00 pp"`.
pub fn format_points(value: f64) -> String {
    format!("{} pp", signed(value))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn signed(value: f64) -> String {
    let body = format_number(value, 2);
    if round_to(value, 2) > 0.0 {
        format!("+{}", body)
    } else {
        body
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
