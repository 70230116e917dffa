//! Parsing and conversion of odds quoted in decimal, American (moneyline) and fractional
//! notations.
//!
//! All parsing functions yield a decimal price: the payout multiple per unit staked, including
//! the stake itself. A decimal price must be finite and strictly greater than 1 to be bettable.
//!
//! [parse] accepts free-form text and detects the notation, in this order:
//!
//! 1. Fractional (`13/10`) or hyphenated (`5-2`) pairs of integers.
//! 2. A comma used as a decimal point (`2,10`), once thousands separators (`1,000`) are removed.
//! 3. American moneylines (`+120`, `-150`, or an unsigned integer of at least 100).
//! 4. Plain decimals (`2.10`).
//!
//! Full-width digits and punctuation (`２．１０`) are folded to their ASCII forms first.

use std::borrow::Cow;
use std::fmt::Formatter;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::param::{self, InvalidParameter};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty odds")]
    Empty,

    #[error("zero denominator in fractional odds '{0}'")]
    ZeroDenominator(String),

    #[error("malformed odds '{0}'")]
    Malformed(String),

    #[error("{0} is not a valid decimal price")]
    InvalidPrice(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    Decimal,
    American,
    Fractional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}
impl Fraction {
    pub fn quotient(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl std::fmt::Display for Fraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Folds full-width digits and the punctuation used in odds into ASCII, trimming surrounding
/// whitespace.
pub fn normalise(raw: &str) -> Cow<str> {
    let trimmed = raw.trim();
    if trimmed.is_ascii() {
        return Cow::Borrowed(trimmed);
    }
    Cow::Owned(trimmed.chars().map(halfwidth).collect())
}

fn halfwidth(ch: char) -> char {
    match ch {
        '０'..='９' => char::from(b'0' + (ch as u32 - '０' as u32) as u8),
        '．' | '。' => '.',
        '，' | '、' => ',',
        '－' | '—' => '-',
        '／' => '/',
        '＋' => '+',
        _ => ch,
    }
}

/// Removes commas acting as thousands separators: a comma preceded by a digit and followed by
/// exactly three digits at a word boundary.
fn strip_thousands(s: &str) -> Cow<str> {
    if !s.contains(',') {
        return Cow::Borrowed(s);
    }
    let chars: Vec<char> = s.chars().collect();
    let is_word = |ch: char| ch.is_ascii_alphanumeric() || ch == '_';
    let mut stripped = String::with_capacity(s.len());
    for (index, &ch) in chars.iter().enumerate() {
        let separator = ch == ','
            && index > 0
            && chars[index - 1].is_ascii_digit()
            && chars.len() >= index + 4
            && chars[index + 1..index + 4].iter().all(char::is_ascii_digit)
            && chars.get(index + 4).map_or(true, |&next| !is_word(next));
        if !separator {
            stripped.push(ch);
        }
    }
    Cow::Owned(stripped)
}

fn is_unsigned_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_signed_integer(s: &str) -> bool {
    is_unsigned_integer(s.strip_prefix(['+', '-']).unwrap_or(s))
}

/// Splits `a/b` or `a-b` where both sides are unsigned integers, tolerating inner whitespace.
fn split_fraction(s: &str) -> Option<(&str, &str)> {
    let (numerator, denominator) = s.split_once(['/', '-'])?;
    let (numerator, denominator) = (numerator.trim(), denominator.trim());
    if is_unsigned_integer(numerator) && is_unsigned_integer(denominator) {
        Some((numerator, denominator))
    } else {
        None
    }
}

fn parse_number(s: &str) -> Result<f64, ParseError> {
    s.parse::<f64>().map_err(|_| ParseError::Malformed(s.to_string()))
}

fn from_fraction(raw: &str, numerator: &str, denominator: &str) -> Result<f64, ParseError> {
    let numerator = parse_number(numerator)?;
    let denominator = parse_number(denominator)?;
    if denominator == 0.0 {
        return Err(ParseError::ZeroDenominator(raw.to_string()));
    }
    Ok(1.0 + numerator / denominator)
}

fn from_american(moneyline: f64) -> f64 {
    if moneyline >= 0.0 {
        1.0 + moneyline / 100.0
    } else {
        1.0 + 100.0 / moneyline.abs()
    }
}

fn validate(price: f64) -> Result<f64, ParseError> {
    if price.is_finite() && price > 1.0 {
        Ok(price)
    } else {
        Err(ParseError::InvalidPrice(price))
    }
}

/// Parses odds in any supported notation into a decimal price.
pub fn parse(raw: &str) -> Result<f64, ParseError> {
    let normalised = normalise(raw);
    if normalised.is_empty() {
        return Err(ParseError::Empty);
    }
    let s = strip_thousands(&normalised);

    if let Some((numerator, denominator)) = split_fraction(&s) {
        return validate(from_fraction(&s, numerator, denominator)?);
    }

    let s = if s.contains(',') && !s.contains('.') {
        Cow::Owned(s.replace(',', "."))
    } else {
        s
    };

    if is_signed_integer(&s) {
        let signed = s.starts_with(['+', '-']);
        let moneyline = parse_number(&s)?;
        if moneyline != 0.0 && (signed || moneyline.abs() >= 100.0) {
            return validate(from_american(moneyline));
        }
    }

    validate(parse_number(&s.replace(',', ""))?)
}

/// Parses odds in a known notation into a decimal price.
pub fn parse_as(format: OddsFormat, raw: &str) -> Result<f64, ParseError> {
    let s = normalise(raw);
    if s.is_empty() {
        return Err(ParseError::Empty);
    }
    let price = match format {
        OddsFormat::Decimal => parse_number(&s)?,
        OddsFormat::American => from_american(parse_number(&s)?),
        OddsFormat::Fractional => {
            let (numerator, denominator) = s
                .split_once('/')
                .ok_or_else(|| ParseError::Malformed(s.to_string()))?;
            let denominator = parse_number(denominator.trim())?;
            if denominator <= 0.0 {
                return Err(ParseError::ZeroDenominator(s.to_string()));
            }
            1.0 + parse_number(numerator.trim())? / denominator
        }
    };
    validate(price)
}

/// Parses a whitespace- or comma-separated list of odds in a known notation, silently skipping
/// tokens that do not yield a valid decimal price.
pub fn parse_list(format: OddsFormat, input: &str) -> Vec<f64> {
    normalise(input)
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|token| !token.is_empty())
        .filter_map(|token| parse_as(format, token).ok())
        .collect()
}

/// The decimal price implied by a probability.
pub fn probability_to_decimal(probability: f64) -> Result<f64, InvalidParameter> {
    if probability.is_finite() && probability > 0.0 {
        Ok(1.0 / probability)
    } else {
        Err(InvalidParameter::new(
            "probability",
            probability,
            "must be finite and positive",
        ))
    }
}

/// Renders a decimal price as a (rounded) American moneyline.
pub fn to_american(decimal: f64) -> Result<i64, InvalidParameter> {
    let decimal = param::decimal_price("decimal price", decimal)?;
    let moneyline = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        -(100.0 / (decimal - 1.0)).round()
    };
    Ok(moneyline as i64)
}

/// Renders a decimal price as fractional odds, using the closest fraction whose denominator
/// does not exceed `max_denominator`. Ties favour the smaller denominator.
pub fn to_fractional(decimal: f64, max_denominator: u64) -> Result<Fraction, InvalidParameter> {
    let decimal = param::decimal_price("decimal price", decimal)?;
    if max_denominator == 0 {
        return Err(InvalidParameter::new(
            "max denominator",
            0.0,
            "must be at least 1",
        ));
    }
    let profit = decimal - 1.0;
    let mut best = (u64::MAX, 1, f64::INFINITY);
    for denominator in 1..=max_denominator {
        let numerator = (profit * denominator as f64).round();
        let error = (profit - numerator / denominator as f64).abs();
        if error < best.2 {
            best = (numerator as u64, denominator, error);
            if error == 0.0 {
                break;
            }
        }
    }
    let (numerator, denominator, _) = best;
    let divisor = gcd(numerator, denominator);
    Ok(Fraction {
        numerator: numerator / divisor,
        denominator: denominator / divisor,
    })
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;
    use std::str::FromStr;

    #[test]
    fn parse_decimal() {
        assert_float_absolute_eq!(2.1, parse("2.10").unwrap(), 1e-12);
        assert_float_absolute_eq!(1.01, parse(" 1.01 ").unwrap(), 1e-12);
        assert_float_absolute_eq!(99.0, parse("99").unwrap(), 1e-12);
    }

    #[test]
    fn parse_american() {
        assert_float_absolute_eq!(2.2, parse("+120").unwrap(), 1e-12);
        assert_float_absolute_eq!(1.6667, parse("-150").unwrap(), 1e-4);
        assert_float_absolute_eq!(2.2, parse("120").unwrap(), 1e-12);
        assert_float_absolute_eq!(2.0, parse("-100").unwrap(), 1e-12);
        assert_float_absolute_eq!(1.99, parse("+99").unwrap(), 1e-12);
    }

    #[test]
    fn parse_fractional() {
        assert_float_absolute_eq!(2.3, parse("13/10").unwrap(), 1e-12);
        assert_float_absolute_eq!(3.5, parse("5-2").unwrap(), 1e-12);
        assert_float_absolute_eq!(1.5, parse(" 1 / 2 ").unwrap(), 1e-12);
        assert_eq!(
            Err(ParseError::ZeroDenominator("5/0".to_string())),
            parse("5/0")
        );
    }

    #[test]
    fn parse_comma_decimal() {
        assert_float_absolute_eq!(2.1, parse("2,10").unwrap(), 1e-12);
        assert_float_absolute_eq!(3.4, parse("3,4").unwrap(), 1e-12);
    }

    #[test]
    fn parse_thousands() {
        // the separator is dropped before notation detection, leaving a moneyline
        assert_float_absolute_eq!(11.0, parse("1,000").unwrap(), 1e-12);
        assert_float_absolute_eq!(10001.0, parse("1,000,000").unwrap(), 1e-9);
        assert_float_absolute_eq!(1000.5, parse("1,000.5").unwrap(), 1e-9);
    }

    #[test]
    fn parse_fullwidth() {
        assert_float_absolute_eq!(2.1, parse("２．１０").unwrap(), 1e-12);
        assert_float_absolute_eq!(2.3, parse("１３／１０").unwrap(), 1e-12);
        assert_float_absolute_eq!(2.2, parse("＋１２０").unwrap(), 1e-12);
        assert_float_absolute_eq!(2.1, parse("２，１０").unwrap(), 1e-12);
    }

    #[test]
    fn parse_rejects() {
        assert_eq!(Err(ParseError::Empty), parse("   "));
        assert_eq!(Err(ParseError::InvalidPrice(1.0)), parse("1.0"));
        assert_eq!(Err(ParseError::InvalidPrice(0.5)), parse("0.5"));
        assert_eq!(Err(ParseError::InvalidPrice(1.0)), parse("0/3"));
        assert!(matches!(parse("abc"), Err(ParseError::Malformed(_))));
        assert!(matches!(parse("2..1"), Err(ParseError::Malformed(_))));
        assert!(matches!(parse("inf"), Err(ParseError::InvalidPrice(_))));
        assert!(matches!(parse("NaN"), Err(ParseError::InvalidPrice(_))));
    }

    #[test]
    fn parse_round_trip() {
        for hundredths in 101..=2000 {
            let price = hundredths as f64 / 100.0;
            let parsed = parse(&format!("{price:.2}")).unwrap();
            assert_float_absolute_eq!(price, parsed, 1e-2);
        }
    }

    #[test]
    fn parse_as_formats() {
        assert_float_absolute_eq!(2.1, parse_as(OddsFormat::Decimal, "2.10").unwrap(), 1e-12);
        assert_float_absolute_eq!(2.2, parse_as(OddsFormat::American, "120").unwrap(), 1e-12);
        assert_float_absolute_eq!(1.5, parse_as(OddsFormat::American, "-200").unwrap(), 1e-12);
        assert_float_absolute_eq!(3.5, parse_as(OddsFormat::Fractional, "5/2").unwrap(), 1e-12);
        assert!(matches!(
            parse_as(OddsFormat::Fractional, "5/0"),
            Err(ParseError::ZeroDenominator(_))
        ));
        assert!(matches!(
            parse_as(OddsFormat::Fractional, "5-2"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_as(OddsFormat::American, "0"),
            Err(ParseError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_list_skips_invalid() {
        let prices = parse_list(OddsFormat::Decimal, "2.10, 3.40 x 0.9\t3.60");
        assert_eq!(vec![2.1, 3.4, 3.6], prices);
        let prices = parse_list(OddsFormat::American, "+120 -150");
        assert_eq!(2, prices.len());
    }

    #[test]
    fn odds_format_from_str() {
        assert_eq!(OddsFormat::American, OddsFormat::from_str("american").unwrap());
        assert_eq!(OddsFormat::Fractional, OddsFormat::from_str("Fractional").unwrap());
        assert_eq!("decimal", OddsFormat::Decimal.to_string());
    }

    #[test]
    fn probability_to_decimal_inverts() {
        assert_float_absolute_eq!(4.0, probability_to_decimal(0.25).unwrap(), 1e-12);
        assert!(probability_to_decimal(0.0).is_err());
        assert!(probability_to_decimal(-0.1).is_err());
        assert!(probability_to_decimal(f64::NAN).is_err());
    }

    #[test]
    fn american_rendering() {
        assert_eq!(120, to_american(2.2).unwrap());
        assert_eq!(-150, to_american(1.0 + 100.0 / 150.0).unwrap());
        assert_eq!(100, to_american(2.0).unwrap());
        assert!(to_american(1.0).is_err());
    }

    #[test]
    fn fractional_rendering() {
        assert_eq!("13/10", to_fractional(2.3, 100).unwrap().to_string());
        assert_eq!("5/2", to_fractional(3.5, 100).unwrap().to_string());
        assert_eq!("1/1", to_fractional(2.0, 100).unwrap().to_string());
        assert_eq!("8/13", to_fractional(1.615, 20).unwrap().to_string());
        assert_float_absolute_eq!(
            0.3,
            to_fractional(1.3, 10).unwrap().quotient(),
            1e-12
        );
        assert!(to_fractional(2.0, 0).is_err());
    }
}
