// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Amount and address helpers.
//!
//! All engine arithmetic happens in the ledger's smallest unit (`u64`);
//! display strings are only produced at the API boundary.

use super::client::LedgerError;

/// Canonicalize an address into a comparable form.
///
/// Addresses are compared case-insensitively after trimming; an empty
/// result means the input was not an address at all.
pub fn canonical_address(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Parse a human-readable amount to base units.
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimal places of the base unit
pub fn parse_amount(amount: &str, decimals: u8) -> Result<u64, LedgerError> {
    let parts: Vec<&str> = amount.trim().split('.').collect();

    if parts.len() > 2 || parts[0].is_empty() {
        return Err(LedgerError::InvalidAmount(
            "Invalid amount format".to_string(),
        ));
    }

    let whole = parts[0]
        .parse::<u64>()
        .map_err(|_| LedgerError::InvalidAmount("Invalid whole number".to_string()))?;

    let decimal_part = if parts.len() == 2 {
        let dec_str = parts[1];
        if dec_str.len() > decimals as usize {
            return Err(LedgerError::InvalidAmount(format!(
                "Too many decimal places (max {})",
                decimals
            )));
        }
        // Pad with zeros to match decimals
        let padded = format!("{:0<width$}", dec_str, width = decimals as usize);
        padded
            .parse::<u64>()
            .map_err(|_| LedgerError::InvalidAmount("Invalid decimal".to_string()))?
    } else {
        0u64
    };

    let multiplier = 10u64.pow(decimals as u32);
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(decimal_part))
        .ok_or_else(|| LedgerError::InvalidAmount("Amount overflow".to_string()))
}

/// Format base units to a human-readable amount.
pub fn format_amount(amount: u64, decimals: u8) -> String {
    if amount == 0 {
        return "0".to_string();
    }

    let divisor = 10u64.pow(decimals as u32);
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder == 0 {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}

/// Format base units rounded to at most four decimal places, for display.
pub fn format_amount_short(amount: u64, decimals: u8) -> String {
    if amount == 0 {
        return "0".to_string();
    }

    let divisor = 10u64.pow(decimals as u32);
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder == 0 {
        return whole.to_string();
    }

    let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
    let truncated = &decimal_str[..decimal_str.len().min(4)];
    let trimmed = truncated.trim_end_matches('0');
    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_whole() {
        let result = parse_amount("1", 9).unwrap();
        assert_eq!(result, 1_000_000_000);
    }

    #[test]
    fn test_parse_amount_decimal() {
        let result = parse_amount("1.5", 9).unwrap();
        assert_eq!(result, 1_500_000_000);
    }

    #[test]
    fn test_parse_amount_fee_buffer() {
        let result = parse_amount("0.0069", 9).unwrap();
        assert_eq!(result, 6_900_000);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("1.2.3", 9).is_err());
        assert!(parse_amount(".5", 9).is_err());
        assert!(parse_amount("abc", 9).is_err());
        assert!(parse_amount("1.1234567891", 9).is_err());
    }

    #[test]
    fn test_parse_amount_overflow() {
        assert!(parse_amount("99999999999999999999", 9).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_000_000_000, 9), "1");
        assert_eq!(format_amount(1_500_000_000, 9), "1.5");
        assert_eq!(format_amount(6_900_000, 9), "0.0069");
        assert_eq!(format_amount(0, 9), "0");
    }

    #[test]
    fn test_format_amount_roundtrip() {
        for raw in ["2", "0.25", "17.000000001"] {
            let base = parse_amount(raw, 9).unwrap();
            assert_eq!(format_amount(base, 9), raw);
        }
    }

    #[test]
    fn test_format_amount_short_truncates() {
        // 1.23456789 truncated to 4 decimals
        assert_eq!(format_amount_short(1_234_567_890, 9), "1.2345");
        assert_eq!(format_amount_short(1_500_000_000, 9), "1.5");
        assert_eq!(format_amount_short(1_000_000_000, 9), "1");
        // below the display precision rounds down to the whole part
        assert_eq!(format_amount_short(1_000_000_001, 9), "1");
    }

    #[test]
    fn test_canonical_address() {
        assert_eq!(canonical_address("  AbC123 "), "abc123");
        assert_eq!(canonical_address(""), "");
        assert_eq!(
            canonical_address("9XyZ"),
            canonical_address("9xYz"),
        );
    }
}
