// 💲 Display Formatting - Currency, percentage and index strings
// KPI cards and table cells render through these helpers so every surface
// (CLI report, TUI, CSV notes) shows the same strings.

/// Placeholder for values not yet reported (months past the data date).
pub const PLACEHOLDER: &str = "—";

/// Compact currency: millions with 2 decimals, thousands with 0, whole
/// units below that.
pub fn fmt_cost(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("${:.0}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// Currency for a possibly-unreported value.
pub fn fmt_cost_opt(value: Option<i64>) -> String {
    match value {
        Some(v) => fmt_cost(v as f64),
        None => PLACEHOLDER.to_string(),
    }
}

/// Ratio as a percentage with one decimal, e.g. 0.92 -> "92.0%".
pub fn fmt_pct(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Performance index with three decimals, e.g. CPI 0.92 -> "0.920".
pub fn fmt_index(value: f64) -> String {
    format!("{:.3}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_cost_millions() {
        assert_eq!(fmt_cost(49_136_385.0), "$49.14M");
        assert_eq!(fmt_cost(1_420_720.0), "$1.42M");
    }

    #[test]
    fn test_fmt_cost_thousands() {
        assert_eq!(fmt_cost(1_420.0), "$1K");
        assert_eq!(fmt_cost(999_499.0), "$999K");
    }

    #[test]
    fn test_fmt_cost_whole_units() {
        assert_eq!(fmt_cost(950.0), "$950");
        assert_eq!(fmt_cost(0.0), "$0");
    }

    #[test]
    fn test_fmt_cost_negative_magnitudes() {
        assert_eq!(fmt_cost(-86_960.0), "$-87K");
        assert_eq!(fmt_cost(-1_500_000.0), "$-1.50M");
        assert_eq!(fmt_cost(-8.0), "$-8");
    }

    #[test]
    fn test_fmt_cost_opt_placeholder() {
        assert_eq!(fmt_cost_opt(None), "—");
        assert_eq!(fmt_cost_opt(Some(2_000_000)), "$2.00M");
    }

    #[test]
    fn test_fmt_pct() {
        assert_eq!(fmt_pct(0.92), "92.0%");
        assert_eq!(fmt_pct(0.0), "0.0%");
        assert_eq!(fmt_pct(1.045), "104.5%");
    }

    #[test]
    fn test_fmt_index() {
        assert_eq!(fmt_index(0.92), "0.920");
        assert_eq!(fmt_index(1.0), "1.000");
    }
}
