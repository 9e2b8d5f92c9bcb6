//! Locale-tolerant number and text parsing.
//!
//! Upstream cells come in two shapes:
//!   "1.921,89 €"   comma decimal, period grouping (German locale)
//!   "123.45"       period decimal, used for machine-formatted values
//!   "€1,395.80"    period decimal, comma grouping (English locale)
//! Sign is never inferred from text; callers pass `negate` from the cell's trend.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ParseError;

static AMOUNT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d.,]*\d|\d").expect("valid amount run regex"));

static COMMA_DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<int>\d{1,3}(?:\.\d{3})+|\d+)(?:,(?P<frac>\d+))?$").expect("valid comma-decimal regex")
});

static PERIOD_DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<int>\d+)(?:\.(?P<frac>\d+))?\s*$").expect("valid period-decimal regex")
});

static CURRENCY_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:(?:€|EUR|\$|USD|£|GBP|CHF)\s?(?P<pre>\d[\d.,]*\d|\d))",
        r"|(?:(?P<post>\d[\d.,]*\d|\d)\s?(?:€|EUR|\$|USD|£|GBP|CHF))"
    ))
    .expect("valid currency amount regex")
});

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[A-Z0-9]{9}[0-9]$").expect("valid identifier regex"));

/// Which decimal separator an extracted amount uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// `1.921,89`
    Comma,
    /// `1,921.89` or `1921.89`
    Period,
}

/// Numeric substring pulled out of a sentence, with its detected style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAmount {
    pub text: String,
    pub style: DecimalStyle,
}

impl ExtractedAmount {
    /// Hand the substring to the parser matching its style.
    pub fn parse(&self) -> Result<f64, ParseError> {
        match self.style {
            DecimalStyle::Comma => parse_comma_decimal(&self.text, false),
            DecimalStyle::Period => parse_period_decimal(&self.text.replace(',', "")),
        }
    }
}

/// Parse a comma-decimal amount such as `"1.921,89 €"` or `"0,21 %"`.
///
/// The first amount-shaped run in `text` is used; surrounding units are ignored.
/// A run that is not comma-decimal as a whole (`"9.87"`, `"1,000.50"`) is `NoMatch`.
pub fn parse_comma_decimal(text: &str, negate: bool) -> Result<f64, ParseError> {
    let run = first_run(text)?;
    let caps = COMMA_DECIMAL_RE
        .captures(run)
        .ok_or_else(|| ParseError::no_match(text))?;

    let int = caps["int"].replace('.', "");
    let normalized = match caps.name("frac") {
        Some(frac) => format!("{}.{}", int, frac.as_str()),
        None => int,
    };

    let value = to_f64(text, &normalized)?;
    Ok(if negate { -value } else { value })
}

/// Parse an amount cell in either locale: `"9,87 €"`, `"€9.87"`, `"€1,395.80"`.
///
/// The decimal mark is detected on the first numeric run, as for free text.
pub fn parse_amount(text: &str, negate: bool) -> Result<f64, ParseError> {
    let run = first_run(text)?;
    let amount = ExtractedAmount {
        text: run.to_string(),
        style: detect_style(run),
    };
    let value = amount.parse()?;
    Ok(if negate { -value } else { value })
}

fn first_run(text: &str) -> Result<&str, ParseError> {
    AMOUNT_RUN_RE
        .find(text)
        .map(|m| m.as_str())
        .ok_or_else(|| ParseError::no_match(text))
}

/// Parse a plain period-decimal number such as `"40"` or `"123.45"`.
///
/// The whole (trimmed) text must be the number.
pub fn parse_period_decimal(text: &str) -> Result<f64, ParseError> {
    let caps = PERIOD_DECIMAL_RE
        .captures(text)
        .ok_or_else(|| ParseError::no_match(text))?;

    let normalized = match caps.name("frac") {
        Some(frac) => format!("{}.{}", &caps["int"], frac.as_str()),
        None => caps["int"].to_string(),
    };

    to_f64(text, &normalized)
}

fn to_f64(input: &str, normalized: &str) -> Result<f64, ParseError> {
    normalized
        .parse::<f64>()
        .map_err(|e| ParseError::InvalidNumber {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

/// Pull the single currency amount out of a sentence, e.g.
/// `"Du hast 500,00 € per Lastschrift hinzugefügt"` -> `500,00` (comma style).
pub fn extract_amount(sentence: &str) -> Result<ExtractedAmount, ParseError> {
    let mut candidates: Vec<String> = Vec::new();
    for caps in CURRENCY_AMOUNT_RE.captures_iter(sentence) {
        let Some(m) = caps.name("pre").or_else(|| caps.name("post")) else {
            continue;
        };
        let text = m.as_str().to_string();
        if !candidates.contains(&text) {
            candidates.push(text);
        }
    }

    match candidates.len() {
        0 => Err(ParseError::no_match(sentence)),
        1 => {
            let text = candidates.remove(0);
            let style = detect_style(&text);
            Ok(ExtractedAmount { text, style })
        }
        _ => Err(ParseError::Ambiguous {
            input: sentence.to_string(),
            candidates,
        }),
    }
}

/// Decide the decimal separator of a bare numeric run.
///
/// With both separators present the last one is the decimal mark. A single
/// separator followed by exactly three digits, or a repeated one, is grouping,
/// unless the integer part is `0` (`0,123` is a fraction).
fn detect_style(text: &str) -> DecimalStyle {
    let last_comma = text.rfind(',');
    let last_period = text.rfind('.');

    match (last_comma, last_period) {
        (Some(c), Some(p)) => {
            if c > p {
                DecimalStyle::Comma
            } else {
                DecimalStyle::Period
            }
        }
        (Some(c), None) => {
            if is_grouping(text, ',', c) {
                DecimalStyle::Period
            } else {
                DecimalStyle::Comma
            }
        }
        (None, Some(p)) => {
            if is_grouping(text, '.', p) {
                DecimalStyle::Comma
            } else {
                DecimalStyle::Period
            }
        }
        (None, None) => DecimalStyle::Period,
    }
}

fn is_grouping(text: &str, sep: char, last: usize) -> bool {
    if text.split(sep).next() == Some("0") {
        return false;
    }
    text.matches(sep).count() > 1 || text.len() - last - 1 == 3
}

/// True for ISIN-shaped identifiers (`IE00B4L5Y983`, `XF000BTC0017`).
pub fn is_identifier(text: &str) -> bool {
    IDENTIFIER_RE.is_match(text)
}

/// Recover an identifier from an icon path such as `logos/IE00B4L5Y983/v2`.
pub fn extract_identifier(path: &str) -> Option<String> {
    path.split('/')
        .map(str::trim)
        .find(|segment| is_identifier(segment))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_decimal_values() {
        assert_eq!(parse_comma_decimal("1.921,89 €", false).unwrap(), 1921.89);
        assert_eq!(parse_comma_decimal("500,00 €", false).unwrap(), 500.00);
        assert_eq!(parse_comma_decimal("0,12382889 €", false).unwrap(), 0.12382889);
        assert_eq!(parse_comma_decimal("1.000.000,01 €", false).unwrap(), 1000000.01);
        assert_eq!(parse_comma_decimal("40", false).unwrap(), 40.0);
        assert_eq!(parse_comma_decimal("0,21 %", false).unwrap(), 0.21);
    }

    #[test]
    fn test_comma_decimal_negate_flips_sign_only() {
        let positive = parse_comma_decimal("1,04 €", false).unwrap();
        let negative = parse_comma_decimal("1,04 €", true).unwrap();
        assert_eq!(positive, 1.04);
        assert_eq!(negative, -1.04);
        assert_eq!(positive.abs(), negative.abs());
    }

    #[test]
    fn test_comma_decimal_ignores_textual_sign() {
        assert_eq!(parse_comma_decimal("-2,50 €", false).unwrap(), 2.50);
    }

    #[test]
    fn test_comma_decimal_no_match_is_not_zero() {
        let err = parse_comma_decimal("Kostenlos", false).unwrap_err();
        assert!(matches!(err, ParseError::NoMatch { .. }));
    }

    #[test]
    fn test_comma_decimal_rejects_period_formatted_runs() {
        for text in ["9.87 €", "€9.87", "1,000.50 €", "€1,395.80"] {
            assert!(
                matches!(parse_comma_decimal(text, false), Err(ParseError::NoMatch { .. })),
                "{text}"
            );
        }
    }

    #[test]
    fn test_parse_amount_either_locale() {
        assert_eq!(parse_amount("€9.87", false).unwrap(), 9.87);
        assert_eq!(parse_amount("€1,395.80", false).unwrap(), 1395.80);
        assert_eq!(parse_amount("9,87 €", false).unwrap(), 9.87);
        assert_eq!(parse_amount("1.921,89 €", false).unwrap(), 1921.89);
        assert_eq!(parse_amount("0,21 %", false).unwrap(), 0.21);
        assert_eq!(parse_amount("1,04 €", true).unwrap(), -1.04);
        assert_eq!(parse_amount("40", false).unwrap(), 40.0);
        assert!(matches!(parse_amount("Kostenlos", false), Err(ParseError::NoMatch { .. })));
        assert!(matches!(parse_amount("1.2.34 €", false), Err(ParseError::NoMatch { .. })));
    }

    #[test]
    fn test_zero_integer_part_is_never_grouping() {
        let amount = extract_amount("Du hast 0,123 € erhalten").unwrap();
        assert_eq!(amount.style, DecimalStyle::Comma);
        assert_eq!(amount.parse().unwrap(), 0.123);
        assert_eq!(extract_amount("You got €0.123").unwrap().parse().unwrap(), 0.123);
        assert_eq!(parse_amount("0,500 %", false).unwrap(), 0.5);
    }

    #[test]
    fn test_period_decimal() {
        assert_eq!(parse_period_decimal("40").unwrap(), 40.0);
        assert_eq!(parse_period_decimal(" 123.45 ").unwrap(), 123.45);
        assert!(matches!(
            parse_period_decimal("1,535249"),
            Err(ParseError::NoMatch { .. })
        ));
        assert!(parse_period_decimal("").is_err());
    }

    #[test]
    fn test_extract_amount_german_and_english() {
        let de = extract_amount("Du hast 500,00 € per Lastschrift hinzugefügt").unwrap();
        assert_eq!(de.text, "500,00");
        assert_eq!(de.style, DecimalStyle::Comma);
        assert_eq!(de.parse().unwrap(), 500.00);

        let en = extract_amount("You received 1,000.00 € by direct debit").unwrap();
        assert_eq!(en.style, DecimalStyle::Period);
        assert_eq!(en.parse().unwrap(), 1000.00);

        let plain = extract_amount("You received 200.00 € per direct debit").unwrap();
        assert_eq!(plain.parse().unwrap(), 200.00);

        let grouped = extract_amount("Du hast 1.921,89\u{a0}€ erhalten").unwrap();
        assert_eq!(grouped.parse().unwrap(), 1921.89);

        let prefixed = extract_amount("You added €25.50").unwrap();
        assert_eq!(prefixed.parse().unwrap(), 25.50);
    }

    #[test]
    fn test_extract_amount_grouping_only() {
        assert_eq!(extract_amount("Du hast 1.000 € erhalten").unwrap().parse().unwrap(), 1000.0);
        assert_eq!(extract_amount("You received 1,000 EUR").unwrap().parse().unwrap(), 1000.0);
    }

    #[test]
    fn test_extract_amount_errors() {
        assert!(matches!(
            extract_amount("Zinsen wurden gutgeschrieben"),
            Err(ParseError::NoMatch { .. })
        ));
        assert!(matches!(
            extract_amount("Du hast 5,00 € von 10,00 € erhalten"),
            Err(ParseError::Ambiguous { .. })
        ));
        // The same amount twice is still one amount.
        assert!(extract_amount("5,00 € (5,00 €)").is_ok());
    }

    #[test]
    fn test_extract_identifier_from_icon() {
        assert_eq!(
            extract_identifier("logos/IE00B4L5Y983/v2"),
            Some("IE00B4L5Y983".to_string())
        );
        assert_eq!(
            extract_identifier("logos/XF000BTC0017/v2"),
            Some("XF000BTC0017".to_string())
        );
        assert_eq!(extract_identifier("logos/bank_n26/v2"), None);
        assert_eq!(extract_identifier(""), None);
    }
}
