use crate::{buffer::count_bits_buffer, simd};
use once_cell::sync::Lazy;
use std::fmt;

/// Truth that the accelerated kernel can run on this CPU
///
/// Probed on first access, then never re-evaluated for the rest of the
/// process. Concurrent first accesses block on the same initialization.
static ACCELERATED: Lazy<bool> = Lazy::new(|| {
    let accelerated = simd::probe();
    log::debug!(
        "popcount: accelerated kernel {} ({})",
        if accelerated { "selected" } else { "unavailable" },
        simd::KERNEL_NAME.unwrap_or("none for this target"),
    );
    accelerated
});

/// Truth that [`count_bits()`] uses the accelerated kernel
///
/// The CPU is only queried on the first call, every later call returns the
/// same answer.
#[inline]
pub fn has_accelerated() -> bool {
    *ACCELERATED
}

// ANCHOR: Backend
/// Strategy used to count the bits of a buffer
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Backend {
    /// SWAR counting of 64-bit words, available everywhere
    Portable,

    /// Architecture-specific SIMD kernel, only usable when the CPU supports it
    Accelerated,
}
//
impl Backend {
    /// Strategy picked by [`count_bits()`] on this CPU
    #[inline]
    pub fn active() -> Self {
        if has_accelerated() {
            Self::Accelerated
        } else {
            Self::Portable
        }
    }

    /// Truth that this strategy can run on this CPU
    pub fn is_available(self) -> bool {
        match self {
            Self::Portable => true,
            Self::Accelerated => has_accelerated(),
        }
    }

    /// Name of the kernel that implements this strategy
    ///
    /// On targets without an accelerated kernel, both strategies are
    /// reported as the portable one.
    pub fn name(self) -> &'static str {
        const PORTABLE: &str = "portable/swar";
        match self {
            Self::Portable => PORTABLE,
            Self::Accelerated => simd::KERNEL_NAME.unwrap_or(PORTABLE),
        }
    }

    /// Count the bits set in `data` with this strategy
    ///
    /// Asking for [`Backend::Accelerated`] on a CPU that does not support it
    /// silently uses the portable strategy instead.
    #[inline]
    pub fn count(self, data: &[u8]) -> u64 {
        match self {
            Self::Accelerated if has_accelerated() => {
                // SAFETY: The probe has confirmed CPU support
                unsafe { simd::count_bits_accelerated(data) }
            }
            Self::Accelerated | Self::Portable => count_bits_buffer(data),
        }
    }
}
//
impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
// ANCHOR_END: Backend

/// Strategy picked by [`count_bits()`] on this CPU
#[inline]
pub fn active_backend() -> Backend {
    Backend::active()
}

// ANCHOR: count_bits
/// Count the bits set in `data`
///
/// Uses the accelerated kernel when the CPU supports it and the portable
/// [`count_bits_buffer`] otherwise. Both give the same result.
#[inline]
pub fn count_bits(data: &[u8]) -> u64 {
    if has_accelerated() {
        // SAFETY: The probe has confirmed CPU support
        unsafe { simd::count_bits_accelerated(data) }
    } else {
        count_bits_buffer(data)
    }
}
// ANCHOR_END: count_bits

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reference::count_bits_buffer_reference, test_utils};
    use proptest::prelude::*;
    use quickcheck_macros::quickcheck;

    crate::test_buffer_counters!(
        (matches_reference, count_bits),
        (portable_backend, |data| Backend::Portable.count(data)),
        (accelerated_backend, |data| Backend::Accelerated.count(data))
    );

    #[test_log::test]
    fn known_buffers() {
        test_utils::check_known_buffers(count_bits);
        test_utils::check_known_buffers(|data| Backend::Accelerated.count(data));
    }

    #[test_log::test]
    fn detection_is_idempotent() {
        let first = has_accelerated();
        for _ in 0..100 {
            assert_eq!(has_accelerated(), first);
            assert_eq!(active_backend(), Backend::active());
        }
        assert_eq!(active_backend() == Backend::Accelerated, first);
        assert_eq!(Backend::Accelerated.is_available(), first);
        assert_eq!(first, simd::probe());
    }

    #[test_log::test]
    fn concurrent_detection() {
        let expected = simd::probe();
        std::thread::scope(|s| {
            let threads = (0..8)
                .map(|_| s.spawn(has_accelerated))
                .collect::<Vec<_>>();
            for thread in threads {
                assert_eq!(thread.join().ok(), Some(expected));
            }
        });
    }

    #[test]
    fn backend_names() {
        assert!(Backend::Portable.is_available());
        assert_eq!(Backend::Portable.name(), "portable/swar");
        assert_eq!(Backend::Portable.to_string(), "portable/swar");
        match simd::KERNEL_NAME {
            Some(name) => assert_eq!(Backend::Accelerated.name(), name),
            None => {
                assert_eq!(Backend::Accelerated.name(), "portable/swar");
                assert!(!has_accelerated());
            }
        }
    }

    #[test]
    fn paths_agree_on_every_length() {
        // Exercise every length up to 2048 with all-ones and pseudo-random
        // contents, so each SIMD block count meets each tail length
        for len in 0..2048 {
            let ones = vec![0xff; len];
            assert_eq!(count_bits(&ones), 8 * len as u64, "len={len}");
            assert_eq!(count_bits_buffer(&ones), 8 * len as u64, "len={len}");

            let random = test_utils::seeded_buffer(len);
            let expected = count_bits_buffer_reference(&random);
            assert_eq!(count_bits(&random), expected, "len={len}");
            assert_eq!(count_bits_buffer(&random), expected, "len={len}");
        }
    }

    #[quickcheck]
    fn concatenation_is_additive(a: Vec<u8>, b: Vec<u8>) -> bool {
        let joined = [&a[..], &b[..]].concat();
        count_bits(&joined) == count_bits(&a) + count_bits(&b)
    }

    proptest! {
        #[test]
        fn backends_agree(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
            let expected = count_bits_buffer_reference(&data);
            prop_assert_eq!(Backend::Portable.count(&data), expected);
            prop_assert_eq!(Backend::Accelerated.count(&data), expected);
            prop_assert_eq!(count_bits(&data), expected);
        }

        #[test]
        fn split_anywhere(data in proptest::collection::vec(any::<u8>(), 0..=1024), split in any::<usize>()) {
            let (head, tail) = data.split_at(split % (data.len() + 1));
            prop_assert_eq!(count_bits(head) + count_bits(tail), count_bits(&data));
        }
    }

    #[quickcheck]
    fn bounded_by_buffer_size(data: Vec<u8>) -> bool {
        count_bits(&data) <= 8 * data.len() as u64
    }
}
