/// Lowercases a `0x`-prefixed hex string, leaving the prefix and any
/// non-hex content untouched.
///
/// Mirrors the normalization the source applies in its `address`/`calldata`
/// property setters: addresses and hex payloads are canonicalized to
/// lowercase at the type boundary so that store keys are stable regardless
/// of the casing an RPC endpoint or caller happens to use.
pub fn to_lowercase_hex(s: impl AsRef<str>) -> String {
    s.as_ref().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_mixed_case_address() {
        assert_eq!(to_lowercase_hex("0xAbCdEF"), "0xabcdef");
    }

    #[test]
    fn leaves_lowercase_untouched() {
        assert_eq!(to_lowercase_hex("0xabc"), "0xabc");
    }
}
