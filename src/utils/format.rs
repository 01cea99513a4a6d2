//! Display formatting for posted messages.

/// Format a USD amount compactly: `$999.99`, `$12.4K`, `$1.2M`, `$3.5B`.
pub fn format_usd(value: f64) -> String {
    let v = if value.is_finite() { value.max(0.0) } else { 0.0 };

    if v >= 1_000_000_000.0 {
        format!("${:.1}B", v / 1_000_000_000.0)
    } else if v >= 1_000_000.0 {
        format!("${:.1}M", v / 1_000_000.0)
    } else if v >= 10_000.0 {
        format!("${:.1}K", v / 1_000.0)
    } else {
        format!("${:.2}", v)
    }
}

/// Format a completion rate in [0,1] as a percentage with one decimal.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate.clamp(0.0, 1.0) * 100.0)
}

/// Format a count with thousands separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_tiers() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999.994), "$999.99");
        assert_eq!(format_usd(12_400.0), "$12.4K");
        assert_eq!(format_usd(1_230_000.0), "$1.2M");
        assert_eq!(format_usd(3_500_000_000.0), "$3.5B");
    }

    #[test]
    fn test_format_usd_non_finite() {
        assert_eq!(format_usd(f64::NAN), "$0.00");
        assert_eq!(format_usd(-10.0), "$0.00");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0), "0.0%");
        assert_eq!(format_rate(0.875), "87.5%");
        assert_eq!(format_rate(1.5), "100.0%");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
