/// Loosely converts a string into a number.
///
/// Surrounding whitespace is ignored, an empty string is `0`, and anything
/// that does not parse is NaN. The data files are hand-written and
/// occasionally store scores as strings, so every numeric field goes
/// through here.
pub fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("9"), 9.0);
        assert_eq!(parse_number(" 8.5 "), 8.5);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("   "), 0.0);
        assert!(parse_number("nine").is_nan());
        assert!(parse_number("9x").is_nan());
    }
}
