use thiserror::Error;

/// Amounts are held as integer cents so that totals add up exactly.
/// 12.50 is stored as 1250.
pub type Cents = i64;

/// Largest amount accepted from user input, 9,999,999,999,999.99.
/// Anything at or below this survives the REAL column round trip exactly.
pub const MAX_AMOUNT_CENTS: Cents = 999_999_999_999_999;

/// Format cents as a plain decimal string.
/// Example: 1250 -> "12.50", -5 -> "-0.05"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal amount typed by the user into cents.
///
/// Accepts an optional sign, whole units and at most two fractional
/// digits. Further digits are only allowed when they are zeros.
/// Example: "12.5" -> 1250, ".99" -> 99, "3" -> 300, "1.250" -> 125
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    if fraction_str.len() > 2 && fraction_str[2..].chars().any(|c| c != '0') {
        return Err(ParseCentsError::TooManyDecimals);
    }

    let fraction_cents: i64 = match fraction_str.len() {
        0 => 0,
        1 => fraction_str[..1].parse::<i64>().unwrap_or(0) * 10,
        _ => fraction_str[..2].parse::<i64>().unwrap_or(0),
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction_cents))
        .ok_or(ParseCentsError::Overflow)?;

    Ok(if negative { -cents } else { cents })
}

/// Convert a REAL column value into cents.
/// Values that are not finite decode as zero.
pub fn cents_from_real(value: f64) -> Cents {
    if value.is_finite() {
        (value * 100.0).round() as Cents
    } else {
        0
    }
}

/// Convert cents into the REAL value written to the store.
pub fn cents_to_real(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("invalid money format")]
    InvalidFormat,

    #[error("more than two decimal places")]
    TooManyDecimals,

    #[error("amount is too large")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1250), "12.50");
        assert_eq!(format_cents(700), "7.00");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5), "-0.05");
        assert_eq!(format_cents(-1950), "-19.50");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("12.50"), Ok(1250));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents("7"), Ok(700));
        assert_eq!(parse_cents("7."), Ok(700));
        assert_eq!(parse_cents(".99"), Ok(99));
        assert_eq!(parse_cents("  3.10 "), Ok(310));
        assert_eq!(parse_cents("+4"), Ok(400));
        assert_eq!(parse_cents("-2.25"), Ok(-225));
        assert_eq!(parse_cents("1.250"), Ok(125));
        assert_eq!(parse_cents("4.0000"), Ok(400));
        assert_eq!(parse_cents("0"), Ok(0));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert_eq!(parse_cents(""), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("   "), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("."), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("abc"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("12abc"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1.2.3"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1,50"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("--1"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1.999"), Err(ParseCentsError::TooManyDecimals));
        assert_eq!(parse_cents("0.005"), Err(ParseCentsError::TooManyDecimals));
        assert_eq!(
            parse_cents("99999999999999999999"),
            Err(ParseCentsError::Overflow)
        );
    }

    #[test]
    fn test_real_conversion() {
        assert_eq!(cents_from_real(12.5), 1250);
        assert_eq!(cents_from_real(0.1 + 0.2), 30);
        assert_eq!(cents_from_real(f64::NAN), 0);
        assert_eq!(cents_from_real(f64::INFINITY), 0);
        assert_eq!(cents_to_real(1950), 19.5);
        assert_eq!(
            cents_from_real(cents_to_real(MAX_AMOUNT_CENTS)),
            MAX_AMOUNT_CENTS
        );
        assert_eq!(
            cents_from_real(cents_to_real(MAX_AMOUNT_CENTS - 1)),
            MAX_AMOUNT_CENTS - 1
        );
    }
}
