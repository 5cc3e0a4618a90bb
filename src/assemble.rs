//! Combines integer and fractional digit strings into the final value.

use crate::detection::PLACEHOLDER;
use crate::error::{ReadError, Result};
use crate::models::Reading;
use tracing::debug;

/// Above this fractional value the ones digit is taken from the previous reading
const STALE_DIGIT_THRESHOLD: f64 = 0.2;

/// Validated digit string: ASCII digits with at most one trailing placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitString(String);

impl DigitString {
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(ReadError::InvalidDigitString(text.to_string()));
        }
        let body = text.strip_suffix(PLACEHOLDER).unwrap_or(text);
        if !body.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReadError::InvalidDigitString(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digit values with the placeholder substituted by 0
    fn digits(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.chars().map(|c| c.to_digit(10).unwrap_or(0))
    }

    /// Value as a whole number
    pub fn integer_value(&self) -> f64 {
        self.digits().fold(0.0, |acc, d| acc * 10.0 + d as f64)
    }

    /// Value as a decimal fraction, `"85"` is 0.85
    pub fn fraction_value(&self) -> f64 {
        let substituted: String = self
            .digits()
            .filter_map(|d| char::from_digit(d, 10))
            .collect();
        // Parse the decimal text so the result is the correctly rounded double
        format!("0.{substituted}").parse().unwrap_or(0.0)
    }
}

/// Build the final reading from the integer digits and an optional fraction.
///
/// With a previous value and a fraction above 0.2 the ones digit of the
/// integer part is replaced by the previous reading's ones digit: at that
/// point the fraction has clearly moved on while the ones wheel may be
/// caught mid-roll.
pub fn assemble(digits: &str, fraction: Option<&str>, previous: Option<f64>) -> Result<Reading> {
    let integer = DigitString::parse(digits)?;
    let mut value = integer.integer_value();

    let fraction = fraction.map(DigitString::parse).transpose()?;
    if let Some(fraction) = &fraction {
        let decimal = fraction.fraction_value();
        match previous {
            Some(previous) if decimal > STALE_DIGIT_THRESHOLD => {
                let corrected = (value / 10.0).floor() * 10.0 + previous.floor().rem_euclid(10.0);
                debug!(
                    "Fraction {} > {}: ones digit taken from previous {} ({} -> {})",
                    decimal, STALE_DIGIT_THRESHOLD, previous, value, corrected
                );
                value = corrected;
            }
            _ => {}
        }
        value += decimal;
    }

    Ok(Reading {
        integer_digits: integer.as_str().to_string(),
        fractional_digits: fraction.map(|f| f.as_str().to_string()),
        value,
    })
}
