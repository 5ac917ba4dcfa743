use alloy::primitives::{Address, U256};

/// Truncate an address to "0xabcd...ef12" format
pub fn truncate_address(addr: &Address) -> String {
    let s = format!("{addr}");
    if s.len() > 14 {
        format!("{}...{}", &s[..8], &s[s.len() - 4..])
    } else {
        s
    }
}

/// Format a wei amount as ether, e.g. 10^18 -> "1.0"
pub fn format_ether(wei: U256) -> String {
    format_units(wei, 18)
}

/// Format a U256 value as decimal with given decimals.
///
/// Keeps every significant fractional digit and always shows at least one,
/// so 1.5 * 10^18 renders as "1.5" and 10^18 as "1.0".
pub fn format_units(value: U256, decimals: u8) -> String {
    if value.is_zero() {
        return "0.0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        return format!("{whole}.0");
    }

    let remainder_str = format!("{remainder}");
    let padded = format!("{:0>width$}", remainder_str, width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');
    format!("{whole}.{trimmed}")
}
