//! Common validation utilities.
//!
//! Quantities are exchanged as text so that they can be checked digit by
//! digit before any arithmetic happens. Values with more fractional digits
//! than the ledger stores are rejected, never rounded.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Number of fractional digits stored for every quantity.
pub const QUANTITY_SCALE: u32 = 2;

/// Maximum length (in characters) of a movement reason.
pub const MAX_REASON_LENGTH: usize = 255;

/// Reason recorded when the caller does not provide one.
pub const DEFAULT_REASON: &str = "no reason specified";

lazy_static! {
    static ref DECIMAL_TEXT: Regex = Regex::new(r"^(\d+)(?:\.(\d+))?$").unwrap();
}

/// Largest quantity an item or a movement can hold (99,999,999.99).
pub fn max_quantity() -> Decimal {
    Decimal::new(9_999_999_999, QUANTITY_SCALE)
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Parses a movement quantity.
///
/// Accepts plain decimal notation only: no sign, no exponent, at most two
/// fractional digits, strictly positive and not above [`max_quantity`].
/// The returned value always carries a scale of two.
pub fn parse_quantity(raw: &str) -> Result<Decimal, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(error("quantity_required", "Quantity is required"));
    }

    let captures = DECIMAL_TEXT.captures(text).ok_or_else(|| {
        error(
            "quantity_format",
            "Quantity must be a positive decimal number",
        )
    })?;

    if let Some(fraction) = captures.get(2) {
        if fraction.as_str().len() > QUANTITY_SCALE as usize {
            return Err(error(
                "quantity_precision",
                "Quantity cannot have more than 2 decimal places",
            ));
        }
    }

    // Integer part longer than the column allows: reject before parsing so
    // that absurdly long inputs never reach Decimal's own overflow path.
    if captures[1].trim_start_matches('0').len() > 8 {
        return Err(error(
            "quantity_range",
            "Quantity cannot exceed 99999999.99",
        ));
    }

    let mut value: Decimal = text
        .parse()
        .map_err(|_| error("quantity_format", "Quantity must be a positive decimal number"))?;

    if value.is_zero() {
        return Err(error(
            "quantity_positive",
            "Quantity must be greater than zero",
        ));
    }
    if value > max_quantity() {
        return Err(error(
            "quantity_range",
            "Quantity cannot exceed 99999999.99",
        ));
    }

    value.rescale(QUANTITY_SCALE);
    Ok(value)
}

/// Trims a movement reason and substitutes the default when it is empty.
pub fn normalize_reason(reason: Option<&str>) -> Result<String, ValidationError> {
    match reason.map(str::trim) {
        None | Some("") => Ok(DEFAULT_REASON.to_string()),
        Some(text) => {
            validate_reason(text)?;
            Ok(text.to_string())
        }
    }
}

/// Validates that a reason fits the movement log column.
pub fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.trim().chars().count() > MAX_REASON_LENGTH {
        return Err(error(
            "reason_length",
            "Reason cannot exceed 255 characters",
        ));
    }
    Ok(())
}
