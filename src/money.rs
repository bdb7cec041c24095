//! Parsing and rounding of monetary amounts.
//!
//! Amounts are dollars stored as `f64`, normalized to two decimal places at
//! every write. Rounding works on the decimal digits of the value's shortest
//! round-trip representation rather than on the binary float, so `200.005`
//! rounds half-up to `200.01` even though its nearest double is slightly
//! below the true half.

use crate::Error;

/// The largest accepted magnitude, matching a 10-digit decimal column with
/// two fractional digits.
pub const MAX_AMOUNT: f64 = 99_999_999.99;

/// Parse a required amount field, rejecting missing values and anything that
/// is not a finite in-range decimal.
pub fn parse_required_amount(value: Option<f64>, field: &'static str) -> Result<f64, Error> {
    match value {
        Some(value) => parse_amount(value, field),
        None => Err(Error::MissingField(field)),
    }
}

/// Parse an optional amount field. `None` stays `None`.
pub fn parse_optional_amount(
    value: Option<f64>,
    field: &'static str,
) -> Result<Option<f64>, Error> {
    value.map(|value| parse_amount(value, field)).transpose()
}

/// Validate an amount and normalize it to two decimal places.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `value` is NaN, infinite, or larger in
/// magnitude than [MAX_AMOUNT].
pub fn parse_amount(value: f64, field: &'static str) -> Result<f64, Error> {
    if !value.is_finite() || value.abs() > MAX_AMOUNT {
        return Err(Error::InvalidAmount(field));
    }

    Ok(round2(value))
}

/// Round a value half-up (away from zero) to two decimal places.
///
/// The caller must ensure `value` is finite and within [MAX_AMOUNT]; derived
/// values such as sums of already-normalized amounts always are.
pub fn round2(value: f64) -> f64 {
    let text = value.to_string();
    let unsigned = text.strip_prefix('-').unwrap_or(&text);

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    let frac = frac_part.as_bytes();
    let mut cents: i64 = int_part.parse::<i64>().unwrap_or(0) * 100;

    if !frac.is_empty() {
        cents += i64::from(frac[0] - b'0') * 10;
    }
    if frac.len() >= 2 {
        cents += i64::from(frac[1] - b'0');
    }
    if frac.len() >= 3 && frac[2] >= b'5' {
        cents += 1;
    }

    let dollars = cents as f64 / 100.0;

    if value.is_sign_negative() { -dollars } else { dollars }
}
