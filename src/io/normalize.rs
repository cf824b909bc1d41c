//! Currency normalization for spreadsheet-style amount cells
//!
//! The authoritative store is maintained by hand, so an amount cell can be
//! a native number, a string with currency markers and grouping ("$ 1.234,56",
//! "U$S 207,00"), or simply blank. This module turns all of those into an
//! exact [`Decimal`] under one fixed convention:
//!
//! - period = thousands grouping, comma = decimal point
//! - currency symbols, letters, and whitespace are stripped
//! - empty or unparseable input maps to zero
//!
//! The zero fallback is a deliberate lenient-parsing policy: a blank cell in
//! the sheet must not abort a whole load, and a zero balance is visibly
//! wrong in review, unlike a swallowed exception. Callers must not pass
//! ambiguous formats; the convention is system-wide and not configurable.
//!
//! All functions are pure and the result is always a finite decimal.

use rust_decimal::Decimal;
use std::str::FromStr;

/// A raw amount cell as read from the store
///
/// Native numbers pass through [`normalize`] unchanged; text goes through
/// [`parse_money`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawAmount {
    /// Already-numeric cell
    Number(Decimal),
    /// Free-form text cell
    Text(String),
}

/// Normalize a raw amount cell into an exact decimal
pub fn normalize(raw: &RawAmount) -> Decimal {
    match raw {
        RawAmount::Number(value) => *value,
        RawAmount::Text(text) => parse_money(text),
    }
}

/// Parse a locale-formatted monetary string into an exact decimal
///
/// Strips everything except digits, the leading sign, and the two
/// separator characters, then applies the fixed convention (drop periods,
/// comma becomes the decimal point). Returns zero for empty or
/// unparseable input.
pub fn parse_money(text: &str) -> Decimal {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | ',' | '.'))
        .collect();

    if kept.is_empty() {
        return Decimal::ZERO;
    }

    // Period groups thousands, comma marks decimals.
    let canonical = kept.replace('.', "").replace(',', ".");

    Decimal::from_str(&canonical).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::symbol_grouped("$ 1.234,56", Decimal::new(123456, 2))]
    #[case::empty("", Decimal::ZERO)]
    #[case::blank("   ", Decimal::ZERO)]
    #[case::dollars("U$S 207,00", Decimal::new(20700, 2))]
    #[case::plain_integer("38520", Decimal::new(38520, 0))]
    #[case::grouped_integer("1.500", Decimal::new(1500, 0))]
    #[case::decimal_only(",50", Decimal::new(50, 2))]
    #[case::negative("-2.400,10", Decimal::new(-240010, 2))]
    #[case::garbage("sin datos", Decimal::ZERO)]
    #[case::stray_sign("1-2", Decimal::ZERO)]
    fn parse_money_cases(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_money(input), expected);
    }

    #[test]
    fn native_numbers_pass_through_unchanged() {
        let raw = RawAmount::Number(Decimal::new(15005, 1)); // 1500.5
        assert_eq!(normalize(&raw), Decimal::new(15005, 1));
    }

    #[test]
    fn text_cells_go_through_the_money_parser() {
        let raw = RawAmount::Text("$ 45.427".to_string());
        assert_eq!(normalize(&raw), Decimal::new(45427, 0));
    }
}
