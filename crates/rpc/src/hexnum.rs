use crate::RpcError;
use serde::Deserialize;

/// Render `n` as a `0x`-prefixed lowercase hex quantity, the shape every
/// `eth_*` RPC parameter expects for block numbers and similar integers.
pub(crate) fn to_quantity(n: u64) -> String {
    format!("0x{n:x}")
}

/// Parse a `0x`-prefixed hex quantity into a `u64`.
pub(crate) fn parse_u64(hex: &str) -> Result<u64, RpcError> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16).map_err(|_| RpcError::MalformedResponse(hex.to_string()))
}

/// Parse a `0x`-prefixed hex quantity into a `u128`, wide enough for wei
/// balances.
pub(crate) fn parse_u128(hex: &str) -> Result<u128, RpcError> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16).map_err(|_| RpcError::MalformedResponse(hex.to_string()))
}

/// Parse a `0x`-prefixed hex quantity into an `i64`, used for block
/// timestamps.
pub(crate) fn parse_i64(hex: &str) -> Result<i64, RpcError> {
    parse_u64(hex).map(|v| v as i64)
}

/// `serde(deserialize_with = ...)` helper: a `0x`-hex string field into a
/// `u64`.
pub(crate) fn de_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_u64(&s).map_err(serde::de::Error::custom)
}

/// `serde(deserialize_with = ...)` helper: a `0x`-hex string field into an
/// `i64`.
pub(crate) fn de_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_i64(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_quantities() {
        assert_eq!(to_quantity(255), "0xff");
        assert_eq!(parse_u64("0xff").unwrap(), 255);
        assert_eq!(parse_u64("0x0").unwrap(), 0);
    }

    #[test]
    fn empty_digits_are_zero() {
        assert_eq!(parse_u64("0x").unwrap(), 0);
    }

    #[test]
    fn rejects_non_hex() {
        assert!(parse_u64("0xzz").is_err());
    }
}
