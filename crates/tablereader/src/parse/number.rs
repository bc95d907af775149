//! Locale-aware number parsing (currency, percentages, separators).

use super::ValueError;
use crate::schema::DecimalSeparator;

/// Currency glyphs removed before parsing.
const CURRENCY_SYMBOLS: &[char] = &['$', '\u{20ac}', '\u{a3}', '\u{a5}'];

/// Parse a non-null number string.
///
/// Handles:
/// - Currency symbols: `$1,234.56`, `€1.234,56`
/// - Percentages: `25.5%` becomes `0.255`
/// - Thousand separators, chosen by the column's decimal separator
pub fn parse_number(value: &str, decimal_separator: DecimalSeparator) -> Result<f64, ValueError> {
    let mut cleaned: String = value.chars().filter(|c| *c != ' ').collect();

    let is_percentage = cleaned.ends_with('%');
    if is_percentage {
        cleaned.pop();
    }

    cleaned.retain(|c| !CURRENCY_SYMBOLS.contains(&c) && !c.is_whitespace());

    let cleaned = match decimal_separator {
        // European format: 1.234,56 -> 1234.56
        DecimalSeparator::Comma => cleaned.replace('.', "").replace(',', "."),
        // US format: 1,234.56 -> 1234.56
        DecimalSeparator::Dot => cleaned.replace(',', ""),
    };

    let result: f64 = cleaned
        .parse()
        .map_err(|_| ValueError::InvalidNumber(value.to_string()))?;

    if is_percentage {
        Ok(result / 100.0)
    } else {
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(value: &str) -> f64 {
        parse_number(value, DecimalSeparator::Dot).unwrap()
    }

    fn comma(value: &str) -> f64 {
        parse_number(value, DecimalSeparator::Comma).unwrap()
    }

    #[test]
    fn test_us_format() {
        assert_eq!(dot("$1,234.56"), 1234.56);
        assert_eq!(dot("1 234.5"), 1234.5);
        assert_eq!(dot("-42"), -42.0);
        assert_eq!(dot("100.12"), 100.12);
    }

    #[test]
    fn test_european_format() {
        assert_eq!(comma("1.234,56"), 1234.56);
        assert_eq!(comma("\u{20ac}1.234,56"), 1234.56);
        assert_eq!(comma("99,90"), 99.9);
    }

    #[test]
    fn test_percentages() {
        assert_eq!(dot("25.5%"), 0.255);
        assert_eq!(dot("10 %"), 0.1);
        assert_eq!(comma("25,5%"), 0.255);
    }

    #[test]
    fn test_other_currencies() {
        assert_eq!(dot("\u{a3}12.50"), 12.5);
        assert_eq!(dot("\u{a5} 3,000"), 3000.0);
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            parse_number("abc", DecimalSeparator::Dot),
            Err(ValueError::InvalidNumber(_))
        ));
        assert!(parse_number("$", DecimalSeparator::Dot).is_err());
        assert!(parse_number("12 usd", DecimalSeparator::Dot).is_err());
        assert!(parse_number("1.2.3", DecimalSeparator::Dot).is_err());
    }
}
