//! Display helpers for dollar amounts

/// Format as whole dollars with thousands separators, e.g. `$11,850`
///
/// Halves round to even and negative amounts render as `$-1,234`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }
    let rounded = amount.round_ties_even();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("$-{}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Round to a fixed number of decimal places for display
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(11_850.0), "$11,850");
        assert_eq!(format_currency(10_000_000.0), "$10,000,000");
    }

    #[test]
    fn test_rounding_ties_to_even() {
        assert_eq!(format_currency(2.5), "$2");
        assert_eq!(format_currency(3.5), "$4");
        assert_eq!(format_currency(1234.4), "$1,234");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_currency(-1234.0), "$-1,234");
        assert_eq!(format_currency(-0.2), "$0");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(12.25, 1), 12.3);
    }
}
