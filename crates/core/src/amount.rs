use rust_decimal::Decimal;
use std::str::FromStr;

const CURRENCY_PREFIXES: &[&str] = &["inr", "rs.", "rs", "usd", "₹", "$"];

/// Parse a captured amount such as `Rs.1,499.00`, `INR 250` or `500/-`.
///
/// Currency markers and thousands separators are stripped; anything left that
/// is not a plain decimal number yields `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut s = raw.trim();

    for prefix in CURRENCY_PREFIXES {
        if s.len() >= prefix.len()
            && s.is_char_boundary(prefix.len())
            && s[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            s = s[prefix.len()..].trim_start();
            break;
        }
    }

    let s = s.trim_end_matches("/-").trim_end_matches('.');
    if s.is_empty() {
        return None;
    }

    let digits: String = s.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&digits).ok().map(|d| d.round_dp(2))
}
