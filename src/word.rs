use num_traits::{PrimInt, WrappingMul};

/// Unsigned machine word that can go through the SWAR bit count reduction
pub trait SwarWord: PrimInt + WrappingMul {
    /// Width of the word in bits
    const BITS: u32;

    /// Word with every byte set to `byte`
    fn splat(byte: u8) -> Self;

    /// Truncate a word known to hold a value <= `BITS` into a count
    fn into_count(self) -> u32;
}

impl SwarWord for u32 {
    const BITS: u32 = u32::BITS;

    #[inline(always)]
    fn splat(byte: u8) -> Self {
        u32::from_ne_bytes([byte; 4])
    }

    #[inline(always)]
    fn into_count(self) -> u32 {
        self
    }
}

impl SwarWord for u64 {
    const BITS: u32 = u64::BITS;

    #[inline(always)]
    fn splat(byte: u8) -> Self {
        u64::from_ne_bytes([byte; 8])
    }

    #[inline(always)]
    fn into_count(self) -> u32 {
        self as u32
    }
}

// ANCHOR: count_bits_word
/// Count the bits set in `v` without branches or loops
///
/// The 32-bit and 64-bit versions only differ by the width of the masks,
/// which are all a single byte pattern repeated across the word.
#[inline(always)]
pub fn count_bits_word<W: SwarWord>(v: W) -> u32 {
    let m1 = W::splat(0x55);
    let m2 = W::splat(0x33);
    let m3 = W::splat(0x0f);
    let h01 = W::splat(0x01);

    // Each 2-bit group now holds its own bit count (0..=2). The subtraction
    // cannot borrow across groups since a group is never smaller than its
    // high bit.
    let v = v - ((v >> 1) & m1);

    // Each nibble holds the sum of its two 2-bit counts (0..=4)
    let v = (v & m2) + ((v >> 2) & m2);

    // Each byte holds the sum of its two nibbles (0..=8). The high nibble of
    // every byte picks up garbage during the addition, hence the final mask.
    let v = (v + (v >> 4)) & m3;

    // Multiplying by 0x01.. accumulates every byte count into the top byte
    (v.wrapping_mul(&h01) >> (W::BITS - 8) as usize).into_count()
}
// ANCHOR_END: count_bits_word

/// Count the bits set in a 32-bit word, result is in `0..=32`
#[inline]
pub fn count_bits_32(v: u32) -> u32 {
    count_bits_word(v)
}

/// Count the bits set in a 64-bit word, result is in `0..=64`
#[inline]
pub fn count_bits_64(v: u64) -> u32 {
    count_bits_word(v)
}
