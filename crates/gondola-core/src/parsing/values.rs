//! Value parsing for Brazilian-formatted price columns and damaged
//! barcode cells.

use rust_decimal::Decimal;

/// Parse a price cell like "R$ 45,99", "1.234,56" or "45.99".
///
/// The currency prefix is optional, the decimal separator may be a comma
/// or a period, and "." is accepted as a thousands separator when a
/// comma is present. Empty or unparseable cells yield zero so a single
/// bad cell never sinks a whole import.
pub fn parse_price(raw: &str) -> Decimal {
    let s = raw.trim();
    if s.is_empty() {
        return Decimal::ZERO;
    }
    let s = s
        .strip_prefix("R$")
        .map(str::trim_start)
        .unwrap_or(s);
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    normalized.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Parse a percentage cell like "12,5%" or "30%". Returns `None` when
/// the cell holds no usable number.
pub fn parse_percentage(raw: &str) -> Option<Decimal> {
    let s = raw.trim().trim_end_matches('%').trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse::<Decimal>().ok()
}

/// Undo Excel's scientific-notation mangling of barcode cells.
///
/// A 13-digit EAN pasted into Excel comes back as e.g. "7,8074E+12".
/// The repaired value concatenates the mantissa digits and pads with
/// zeros up to the exponent: "7" + "8074" + 8 zeros = "7807400000000".
/// Anything that does not look like scientific notation is returned
/// trimmed but otherwise untouched.
pub fn repair_barcode(raw: &str) -> String {
    let s = raw.trim();
    match expand_scientific(s) {
        Some(repaired) => repaired,
        None => s.to_string(),
    }
}

fn expand_scientific(s: &str) -> Option<String> {
    let (mantissa, exp_part) = s.split_once(['e', 'E'])?;
    let (int_part, frac_part) = mantissa.split_once([',', '.'])?;
    if int_part.is_empty() || frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let exp: i64 = exp_part.strip_prefix('+').unwrap_or(exp_part).parse().ok()?;

    let zeros = (exp - frac_part.len() as i64).max(0) as usize;
    let mut digits = String::with_capacity(int_part.len() + frac_part.len() + zeros);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    digits.extend(std::iter::repeat('0').take(zeros));
    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_with_currency_prefix() {
        assert_eq!(parse_price("R$ 45,99"), dec!(45.99));
        assert_eq!(parse_price("R$45,99"), dec!(45.99));
    }

    #[test]
    fn test_price_with_thousands_separator() {
        assert_eq!(parse_price("1.234,56"), dec!(1234.56));
    }

    #[test]
    fn test_price_already_numeric() {
        assert_eq!(parse_price("45.99"), dec!(45.99));
        assert_eq!(parse_price("12"), dec!(12));
    }

    #[test]
    fn test_price_zero_forms() {
        assert_eq!(parse_price("0"), Decimal::ZERO);
        assert_eq!(parse_price("0,00"), Decimal::ZERO);
    }

    #[test]
    fn test_price_garbage_is_zero() {
        assert_eq!(parse_price(""), Decimal::ZERO);
        assert_eq!(parse_price("   "), Decimal::ZERO);
        assert_eq!(parse_price("abc"), Decimal::ZERO);
        assert_eq!(parse_price("R$ --"), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_parses_comma_decimal() {
        assert_eq!(parse_percentage("12,5%"), Some(dec!(12.5)));
        assert_eq!(parse_percentage("30%"), Some(dec!(30)));
        assert_eq!(parse_percentage(""), None);
        assert_eq!(parse_percentage("n/a"), None);
    }

    #[test]
    fn test_barcode_scientific_comma() {
        assert_eq!(repair_barcode("7,8074E+12"), "7807400000000");
    }

    #[test]
    fn test_barcode_scientific_dot_lowercase() {
        assert_eq!(repair_barcode("7.8074e+12"), "7807400000000");
        assert_eq!(repair_barcode("7.89123e12"), "7891230000000");
    }

    #[test]
    fn test_barcode_exponent_smaller_than_fraction() {
        // exponent already covered by fraction digits, no padding
        assert_eq!(repair_barcode("7,891234E+3"), "7891234");
    }

    #[test]
    fn test_barcode_plain_is_untouched() {
        assert_eq!(repair_barcode(" 7891234567890 "), "7891234567890");
        assert_eq!(repair_barcode("ABC-001"), "ABC-001");
    }

    #[test]
    fn test_barcode_not_scientific_keeps_commas() {
        assert_eq!(repair_barcode("45,99"), "45,99");
    }
}
