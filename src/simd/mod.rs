//! Architecture-specific accelerated bit counting
//!
//! Each supported architecture provides one kernel with the same contract as
//! [`count_bits_buffer`](crate::count_bits_buffer), gated behind a runtime
//! check of the CPU extension it relies on.

#[cfg(target_arch = "aarch64")]
pub mod neon;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
pub mod ssse3;

// ANCHOR: kernel
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
mod kernel {
    pub const NAME: Option<&str> = Some("x86/ssse3");

    pub fn probe() -> bool {
        cfg!(target_feature = "ssse3") || std::arch::is_x86_feature_detected!("ssse3")
    }

    pub use super::ssse3::count_bits_ssse3 as count_bits;
}

#[cfg(target_arch = "aarch64")]
mod kernel {
    pub const NAME: Option<&str> = Some("aarch64/neon");

    pub fn probe() -> bool {
        cfg!(target_feature = "neon") || std::arch::is_aarch64_feature_detected!("neon")
    }

    pub use super::neon::count_bits_neon as count_bits;
}

#[cfg(not(any(
    all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"),
    target_arch = "aarch64"
)))]
mod kernel {
    pub const NAME: Option<&str> = None;

    pub fn probe() -> bool {
        false
    }

    pub unsafe fn count_bits(data: &[u8]) -> u64 {
        crate::buffer::count_bits_buffer(data)
    }
}
// ANCHOR_END: kernel

/// Name of the accelerated kernel built for this target, if there is one
pub const KERNEL_NAME: Option<&str> = kernel::NAME;

/// Truth that the accelerated kernel can run on this CPU
///
/// This queries the CPU every time it is called, unless the required
/// extension is statically enabled. On targets without an accelerated kernel
/// it returns `false` without querying anything.
pub fn probe() -> bool {
    kernel::probe()
}

/// Count the bits set in `data` with the accelerated kernel
///
/// On targets without an accelerated kernel, this is the portable counter.
///
/// # Safety
///
/// [`probe()`] must have returned `true` on this CPU.
#[inline]
pub unsafe fn count_bits_accelerated(data: &[u8]) -> u64 {
    // SAFETY: Forwarded from the caller
    unsafe { kernel::count_bits(data) }
}
