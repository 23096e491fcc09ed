#[cfg(target_arch = "x86")]
use core::arch::x86::_mm_shuffle_epi8;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::_mm_shuffle_epi8;
use safe_arch::m128i;

/// Number of bytes per SSE vector
const LANES: usize = 16;

/// Number of blocks that can be accumulated into 8-bit lanes before spilling,
/// each block adds at most 8 to every lane
const BLOCKS_PER_SPILL: u8 = u8::MAX / 8;

/// Bit count of every possible nibble
const NIBBLE_COUNTS: [u8; LANES] = [0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4];

/// Look up each byte of `indices` in `table` (`pshufb`)
#[inline]
#[target_feature(enable = "ssse3")]
unsafe fn shuffle_bytes(table: m128i, indices: m128i) -> m128i {
    m128i(_mm_shuffle_epi8(table.0, indices.0))
}

// ANCHOR: count_bits_ssse3
/// Count the bits set in `data` using SSSE3 nibble lookups
///
/// Every byte is split into its two nibbles, which are used as indices into a
/// 16-entry bit count table. Per-byte counts are summed in 8-bit lanes, which
/// get spilled into 64-bit lanes with `psadbw` before they can overflow.
/// Trailing bytes that do not fill a vector go through the portable counter.
///
/// # Safety
///
/// The CPU must support SSSE3.
#[target_feature(enable = "ssse3")]
pub unsafe fn count_bits_ssse3(data: &[u8]) -> u64 {
    let table = m128i::from(NIBBLE_COUNTS);
    let low_nibbles = safe_arch::set_splat_i8_m128i(0x0f);
    let zeros = safe_arch::zeroed_m128i();

    // Set up narrow and wide accumulators
    let mut narrow = zeros;
    let mut narrow_usage = 0;
    let mut wide = zeros;

    // Count full vectors
    let mut blocks = data.chunks_exact(LANES);
    for block in &mut blocks {
        let mut bytes = [0; LANES];
        bytes.copy_from_slice(block);
        let block = safe_arch::load_unaligned_m128i(&bytes);

        let low = safe_arch::bitand_m128i(block, low_nibbles);
        let high = safe_arch::bitand_m128i(safe_arch::shr_imm_u16_m128i::<4>(block), low_nibbles);
        // SAFETY: SSSE3 support is a precondition of this function
        let counts = unsafe {
            safe_arch::add_i8_m128i(shuffle_bytes(table, low), shuffle_bytes(table, high))
        };
        narrow = safe_arch::add_i8_m128i(narrow, counts);

        // When the narrow lanes fill up, spill to the wide ones
        narrow_usage += 1;
        if narrow_usage == BLOCKS_PER_SPILL {
            wide = safe_arch::add_i64_m128i(wide, safe_arch::sum_of_u8_abs_diff_m128i(narrow, zeros));
            narrow = zeros;
            narrow_usage = 0;
        }
    }

    // Merge the narrow lanes, then the wide lanes into a scalar
    wide = safe_arch::add_i64_m128i(wide, safe_arch::sum_of_u8_abs_diff_m128i(narrow, zeros));
    let [low_half, high_half]: [u64; 2] = wide.into();

    low_half + high_half + crate::buffer::count_bits_buffer(blocks.remainder())
}
// ANCHOR_END: count_bits_ssse3
