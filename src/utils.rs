/// Parses an unsigned integer from a run of digit bytes in one forward pass,
/// without materializing an intermediate string.
///
/// Each byte is masked to its low nibble and weighted by its decimal
/// position, so the same routine covers ASCII digits and the raw `0..=9`
/// bytes of a binary length prefix. The caller must have validated that the
/// range contains only digits; values past `u64::MAX` wrap.
pub(crate) fn parse_decimal(digits: &[u8]) -> u64 {
    let mut result: u64 = 0;
    for (i, byte) in digits.iter().enumerate() {
        let mut digit = u64::from(byte & 0xF);
        for _ in 0..digits.len() - 1 - i {
            digit = digit.wrapping_mul(10);
        }
        result = result.wrapping_add(digit);
    }
    result
}
