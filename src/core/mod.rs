//! Core module: Fixed-capacity Buffer dengan cursor
//!
//! Prinsip desain:
//! - Fixed capacity: storage dialokasi sekali, tidak pernah resize
//! - Truncating I/O: write/read di-clamp ke ruang yang tersedia
//! - Pluggable storage: heap atau anonymous mmap

mod buffer;
mod scalar;
mod storage;

pub use buffer::{Buffer, Init, Whence};
pub use scalar::Scalar;
pub use storage::Storage;
