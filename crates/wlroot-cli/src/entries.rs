//! Turning configured entry strings into the bytes that get hashed.
//!
//! A `0x`-prefixed hex string is decoded, so an address hashes as its 20 raw
//! bytes the way `soliditySha3` packs it, regardless of checksum casing.
//! Anything else is hashed as its UTF-8 text.

/// Bytes to hash for one configured entry.
pub fn encode_entry(raw: &str) -> Vec<u8> {
    let trimmed = raw.trim();
    if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if let Ok(bytes) = hex::decode(digits) {
            return bytes;
        }
    }
    trimmed.as_bytes().to_vec()
}

/// Encode a whole list, preserving order.
pub fn encode_all(raw: &[String]) -> Vec<Vec<u8>> {
    raw.iter().map(|entry| encode_entry(entry)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_decode_to_twenty_bytes() {
        let bytes = encode_entry("0xA1A2EE28Ef70A03864824866b6919c8E6B90c3cD");
        assert_eq!(bytes.len(), 20);
        assert_eq!(bytes[0], 0xa1);
    }

    #[test]
    fn checksum_casing_does_not_matter() {
        assert_eq!(
            encode_entry("0xA1A2EE28Ef70A03864824866b6919c8E6B90c3cD"),
            encode_entry("0xa1a2ee28ef70a03864824866b6919c8e6b90c3cd")
        );
    }

    #[test]
    fn invalid_hex_is_text() {
        assert_eq!(encode_entry("0xnothex"), b"0xnothex");
        assert_eq!(encode_entry("0xabc"), b"0xabc");
    }

    #[test]
    fn plain_text_is_utf8() {
        assert_eq!(encode_entry(" alice "), b"alice");
    }

    #[test]
    fn order_is_preserved() {
        let list = vec!["b".to_string(), "a".to_string()];
        assert_eq!(encode_all(&list), vec![b"b".to_vec(), b"a".to_vec()]);
    }
}
