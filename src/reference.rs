use crate::word::count_bits_32;

// ANCHOR: reference
/// Count the bits set in `data` one byte at a time
///
/// This is the semantic baseline that every other buffer counter is checked
/// against. It does no batching, so prefer [`count_bits`](crate::count_bits)
/// outside of tests.
pub fn count_bits_buffer_reference(data: &[u8]) -> u64 {
    data.iter()
        .map(|&byte| u64::from(count_bits_32(u32::from(byte))))
        .sum()
}
// ANCHOR_END: reference
