//! Population count of byte buffers, with a portable SWAR implementation and
//! a SIMD implementation that is selected at runtime when the CPU allows.

pub mod buffer;
pub mod dispatch;
pub mod reference;
pub mod simd;
pub mod word;

pub use buffer::count_bits_buffer;
pub use dispatch::{active_backend, count_bits, has_accelerated, Backend};
pub use reference::count_bits_buffer_reference;
pub use word::{count_bits_32, count_bits_64};
