use rust_decimal::Decimal;
use thiserror::Error;
use withdrawal_core::calculations::common::sanitize_amount_f64;

/// Error returned when amount text cannot be read as a number.
#[derive(Debug, Error)]
#[error("invalid amount '{input}'")]
pub struct ParseAmountError {
    input: String,
}

/// Strips whitespace, currency symbols and thousands separators.
fn normalize_amount_input(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '$' | '₹' | ',' | '_'))
        .collect()
}

/// Parses a withdrawal amount typed by the user.
///
/// Accepts `"50,000"`, `"$50000.00"` or `"₹4,35,000"`. Empty input is 0.
/// Floating-point spellings such as `"5e4"`, `"inf"` or `"NaN"` go through
/// the core's clamping, so non-finite values become 0 rather than an error.
/// Negative amounts are passed through; the calculators clamp them.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }

    if let Ok(value) = normalized.parse::<Decimal>() {
        return Ok(value);
    }

    normalized
        .parse::<f64>()
        .map(sanitize_amount_f64)
        .map_err(|e| {
            tracing::error!(input = %s, "invalid amount: {}", e);
            ParseAmountError {
                input: s.to_string(),
            }
        })
}

/// Reads a yes/no answer. Returns `None` when the answer is neither.
pub fn parse_yes_no(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "t" | "1" => Some(true),
        "no" | "n" | "false" | "f" | "0" => Some(false),
        _ => None,
    }
}
