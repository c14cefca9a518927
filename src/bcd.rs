//! Packed binary-coded-decimal conversion.
//!
//! Every calendar register of the DS1315 holds two decimal digits, one
//! per nibble. These helpers are pure and permissive: no range checks
//! are performed, matching the chip's own lack of error signalling.

/// Encodes a binary value in `[0, 99]` as a packed BCD byte.
///
/// The caller must ensure the input is at most 99. Larger inputs
/// produce a nibble pair that is not a pair of decimal digits.
pub const fn encode(decimal: u8) -> u8 {
    (decimal / 10) << 4 | (decimal % 10)
}

/// Decodes a packed BCD byte into its binary value.
///
/// Symmetric inverse of [`encode`] for valid packed BCD. Nibbles above
/// 9 are not rejected; they decode to a value above 99.
pub const fn decode(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Maps both nibbles of a packed BCD byte to ASCII digits.
///
/// The nibbles are converted independently (`b'0' + nibble`) without
/// going through [`decode`], so a corrupted nibble above 9 comes out as
/// the corresponding non-digit byte and is visible in whatever output
/// it ends up in, instead of being silently masked.
pub const fn digit_pair(bcd: u8) -> [u8; 2] {
    [b'0' + (bcd >> 4), b'0' + (bcd & 0x0F)]
}
