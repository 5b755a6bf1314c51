use alloy::primitives::keccak256;

/// Compute `eth_call` calldata: `keccak256(signature)[..4] ++
/// encoded_args`, lowercased.
///
/// `signature` is a canonical Solidity function signature, e.g.
/// `"balanceOf(address)"`, hashed to derive the 4-byte selector.
/// `encoded_args` is the already ABI-encoded argument tuple; producing it
/// from typed Solidity values is out of scope here (spec.md §1: "ABI
/// decoding and function-selector/calldata encoding are assumed provided
/// by a library binding to the chain's ABI") — this function only owns
/// the selector-hash-plus-concatenation glue the cache key is built from.
pub fn calldata(signature: &str, encoded_args: &[u8]) -> String {
    let selector = &keccak256(signature.as_bytes())[..4];

    let mut bytes = Vec::with_capacity(4 + encoded_args.len());
    bytes.extend_from_slice(selector);
    bytes.extend_from_slice(encoded_args);

    format!("0x{}", hex::encode(bytes))
}

/// Compute an event's `topics[0]`: the full 32-byte `keccak256` of its
/// canonical signature, e.g. `"Transfer(address,address,uint256)"`, as
/// `0x`-hex. Unlike [`calldata`] this is not truncated — `eth_getLogs`
/// matches the whole hash.
pub fn event_topic0(signature: &str) -> String {
    format!("0x{}", hex::encode(keccak256(signature.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_of_selector_matches_known_value() {
        // balanceOf(address) selector is 0x70a08231.
        let padded_address = {
            let mut buf = [0u8; 32];
            buf[12..].copy_from_slice(&[0xaa; 20]);
            buf
        };
        let data = calldata("balanceOf(address)", &padded_address);
        assert!(data.starts_with("0x70a08231"));
    }

    #[test]
    fn output_is_lowercase() {
        let data = calldata("balanceOf(address)", &[0xAB, 0xCD]);
        assert_eq!(data, data.to_ascii_lowercase());
    }

    #[test]
    fn no_args_is_just_the_selector() {
        let data = calldata("totalSupply()", &[]);
        assert_eq!(data.len(), 2 + 8);
    }

    #[test]
    fn transfer_topic0_matches_known_value() {
        // keccak256("Transfer(address,address,uint256)")
        assert_eq!(
            event_topic0("Transfer(address,address,uint256)"),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
