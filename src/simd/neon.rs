use core::arch::aarch64::{
    vaddq_u64, vaddvq_u64, vcntq_u8, vdupq_n_u64, vld1q_u8, vpaddlq_u16, vpaddlq_u32, vpaddlq_u8,
};

/// Number of bytes per NEON vector
const LANES: usize = 16;

// ANCHOR: count_bits_neon
/// Count the bits set in `data` using the NEON per-byte `cnt` instruction
///
/// Per-byte counts are widened pairwise all the way to 64-bit lanes on every
/// block, so no lane can overflow. Trailing bytes that do not fill a vector go
/// through the portable counter.
///
/// # Safety
///
/// The CPU must support NEON.
#[target_feature(enable = "neon")]
pub unsafe fn count_bits_neon(data: &[u8]) -> u64 {
    let mut wide = vdupq_n_u64(0);

    let mut blocks = data.chunks_exact(LANES);
    for block in &mut blocks {
        // SAFETY: `block` is exactly LANES bytes long and NEON support is a
        //         precondition of this function
        let counts = unsafe { vcntq_u8(vld1q_u8(block.as_ptr())) };
        let counts = vpaddlq_u32(vpaddlq_u16(vpaddlq_u8(counts)));
        wide = vaddq_u64(wide, counts);
    }

    vaddvq_u64(wide) + crate::buffer::count_bits_buffer(blocks.remainder())
}
// ANCHOR_END: count_bits_neon
