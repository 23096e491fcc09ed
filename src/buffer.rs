use crate::word::{count_bits_32, count_bits_64};

// ANCHOR: buffer
/// Count the bits set in `data`, 8 bytes at a time where possible
///
/// Bytes are assembled into little-endian words, then each word goes through
/// the SWAR reduction of [`count_bits_64`]. A trailing 4-byte group is
/// counted with [`count_bits_32`], and the last 0 to 3 bytes one by one.
pub fn count_bits_buffer(data: &[u8]) -> u64 {
    let mut count = 0;

    // Accumulate full 64-bit words
    let mut words = data.chunks_exact(8);
    for word in &mut words {
        let mut bytes = [0; 8];
        bytes.copy_from_slice(word);
        count += u64::from(count_bits_64(u64::from_le_bytes(bytes)));
    }

    // Accumulate the remaining 32-bit word, if any
    let mut remainder = words.remainder();
    if let [b0, b1, b2, b3, rest @ ..] = remainder {
        count += u64::from(count_bits_32(u32::from_le_bytes([*b0, *b1, *b2, *b3])));
        remainder = rest;
    }
    debug_assert!(remainder.len() < 4);

    // Accumulate trailing bytes
    for &byte in remainder {
        count += u64::from(count_bits_32(u32::from(byte)));
    }
    count
}
// ANCHOR_END: buffer
