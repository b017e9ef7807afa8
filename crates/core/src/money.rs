//! Currency helpers shared by the pricing evaluator and the shipping resolver.
//!
//! All amounts are Turkish lira in `NUMERIC(12,2)` columns. Every computed
//! amount is rounded to kuruş (two decimal places) with half-up rounding,
//! i.e. midpoint away from zero: `10.005 -> 10.01`, `10.004 -> 10.00`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of minor-unit digits (kuruş).
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to kuruş using half-up rounding.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a strictly positive amount from free-form text.
///
/// Accepts `"500"`, `" 499.99 "` and the Turkish decimal comma `"499,99"`.
/// Returns `None` for empty, malformed, zero or negative input.
pub fn parse_positive_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        trimmed.replace(',', ".")
    };
    Decimal::from_str(&normalized)
        .ok()
        .filter(|amount| *amount > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_midpoint_away_from_zero() {
        assert_eq!(round_currency(dec!(10.005)), dec!(10.01));
        assert_eq!(round_currency(dec!(10.004)), dec!(10.00));
        assert_eq!(round_currency(dec!(0.125)), dec!(0.13));
    }

    #[test]
    fn parses_plain_and_comma_amounts() {
        assert_eq!(parse_positive_amount("500"), Some(dec!(500)));
        assert_eq!(parse_positive_amount(" 499.99 "), Some(dec!(499.99)));
        assert_eq!(parse_positive_amount("499,99"), Some(dec!(499.99)));
    }

    #[test]
    fn rejects_invalid_amounts() {
        assert_eq!(parse_positive_amount(""), None);
        assert_eq!(parse_positive_amount("abc"), None);
        assert_eq!(parse_positive_amount("0"), None);
        assert_eq!(parse_positive_amount("-10"), None);
    }
}
