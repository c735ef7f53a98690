//! Display helpers

/// Group thousands: `1250` → `"1,250"`
pub fn format_count(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Money with two decimals and grouped thousands: `54321.5` → `"$54,321.50"`
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, group_digits(whole), cents)
}

/// Percentage with two decimals: `20.0` → `"20.00%"`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1250), "1,250");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(54_321.5), "$54,321.50");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(-12.5), "-$12.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(20.0), "20.00%");
        assert_eq!(format_percent(33.333), "33.33%");
    }
}
