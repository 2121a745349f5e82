//! Account address rules: recipient validation and the short display form.

use crate::constants::{ADDRESS_BYTES, ADDRESS_LEN};

/// Check that `addr` is `0x` followed by exactly 40 hex digits (either case).
pub fn is_valid_address(addr: &str) -> bool {
    if addr.len() != ADDRESS_LEN {
        return false;
    }
    match addr.strip_prefix("0x") {
        Some(digits) => matches!(hex::decode(digits), Ok(bytes) if bytes.len() == ADDRESS_BYTES),
        None => false,
    }
}

/// Shorten an address to `0x1234...abcd` (first 6 and last 4 characters).
///
/// Strings too short to shorten are returned unchanged.
pub fn format_address(addr: &str) -> String {
    let chars: Vec<char> = addr.chars().collect();
    if chars.len() <= 10 {
        return addr.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
