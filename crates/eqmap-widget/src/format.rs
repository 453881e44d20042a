//! Price text for popups, tooltips, and pill markers.

const NOT_AVAILABLE: &str = "Not Available";

/// Whole-dollar US currency, e.g. `650000.0` → `"$650,000"`.
///
/// Rounds half away from zero. A missing or non-finite price renders as
/// `"Not Available"`.
#[must_use]
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.is_finite() => {
            let rounded = p.round();
            let sign = if rounded < 0.0 { "-" } else { "" };
            format!("{sign}${}", group_thousands(whole_dollars(rounded.abs())))
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Short price for a pill marker: `"650k"` below one million (thousands,
/// rounded up) and `"1.25m"` from one million (rounded up to the next 10k).
#[must_use]
pub fn format_price_for_pin(price: Option<f64>) -> String {
    match price {
        Some(p) if p.is_finite() && p >= 0.0 => {
            if p >= 1_000_000.0 {
                let millions = (p / 10_000.0).ceil() * 10_000.0 / 1_000_000.0;
                format!("{millions:.2}m")
            } else {
                format!("{}k", whole_dollars((p / 1_000.0).ceil()))
            }
        }
        _ => "N/A".to_string(),
    }
}

// Callers pass a finite, non-negative, already-rounded value.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_dollars(value: f64) -> u64 {
    value as u64
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
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
    fn format_price_groups_thousands() {
        assert_eq!(format_price(Some(650_000.0)), "$650,000");
        assert_eq!(format_price(Some(1_250_000.0)), "$1,250,000");
        assert_eq!(format_price(Some(999.0)), "$999");
        assert_eq!(format_price(Some(0.0)), "$0");
    }

    #[test]
    fn format_price_rounds_to_whole_dollars() {
        assert_eq!(format_price(Some(249_999.5)), "$250,000");
        assert_eq!(format_price(Some(1_234.49)), "$1,234");
        assert_eq!(format_price(Some(-0.4)), "$0");
    }

    #[test]
    fn format_price_missing_or_nan_is_not_available() {
        assert_eq!(format_price(None), "Not Available");
        assert_eq!(format_price(Some(f64::NAN)), "Not Available");
        assert_eq!(format_price(Some(f64::INFINITY)), "Not Available");
    }

    #[test]
    fn pin_price_under_a_million_rounds_up_to_thousands() {
        assert_eq!(format_price_for_pin(Some(650_000.0)), "650k");
        assert_eq!(format_price_for_pin(Some(649_001.0)), "650k");
        assert_eq!(format_price_for_pin(Some(999_999.0)), "1000k");
    }

    #[test]
    fn pin_price_over_a_million_rounds_up_to_ten_thousands() {
        assert_eq!(format_price_for_pin(Some(1_000_000.0)), "1.00m");
        assert_eq!(format_price_for_pin(Some(1_241_000.0)), "1.25m");
    }

    #[test]
    fn pin_price_missing_is_na() {
        assert_eq!(format_price_for_pin(None), "N/A");
        assert_eq!(format_price_for_pin(Some(f64::NAN)), "N/A");
    }
}
