//! Human-readable size strings
//!
//! Build configuration passes memory sizes such as `4g`, `512K` or
//! `0x1000b`. The optional unit letter is stripped before the radix prefix
//! is inspected, so a trailing `b` never turns into a hex digit.

use crate::error::SizeError;

/// Unit suffixes and their multipliers (binary, case-insensitive)
pub const UNITS: [(char, u64); 5] = [
    ('b', 1),
    ('k', 1 << 10),
    ('m', 1 << 20),
    ('g', 1 << 30),
    ('t', 1 << 40),
];

fn split_unit(s: &str) -> (&str, u64) {
    for (suffix, multiplier) in UNITS {
        if let Some(number) = s.strip_suffix(suffix) {
            return (number, multiplier);
        }
    }
    (s, 1)
}

fn split_radix(s: &str) -> (&str, u32) {
    if let Some(digits) = s.strip_prefix("0x") {
        (digits, 16)
    } else if let Some(digits) = s.strip_prefix("0o") {
        (digits, 8)
    } else if let Some(digits) = s.strip_prefix("0b") {
        (digits, 2)
    } else {
        (s, 10)
    }
}

/// Parse a size string into a byte count
pub fn parse_size(input: &str) -> Result<u64, SizeError> {
    let normalized = input.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(SizeError::Empty);
    }

    let (number, multiplier) = split_unit(&normalized);
    let (digits, radix) = split_radix(number);
    let value = u64::from_str_radix(digits, radix).map_err(|source| SizeError::InvalidNumber {
        input: input.to_string(),
        source,
    })?;

    value
        .checked_mul(multiplier)
        .ok_or_else(|| SizeError::Overflow {
            input: input.to_string(),
        })
}
