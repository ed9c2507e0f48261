//! zbuff - Fixed-Capacity Byte Buffer + Binary Pack/Unpack
//!
//! Arsitektur:
//! - Fixed storage: dialokasi sekali (heap atau anonymous mmap), tidak resize
//! - Cursor-based I/O: write/read/seek di-clamp, tidak pernah error
//! - Format codec: directive (`A f d n c b h H i I l L`) + repeat + endianness
//! - Host surface: dispatch method by name untuk embedding di scripting runtime
//!
//! ```
//! use zbuff::{Buffer, Init, Value, Whence};
//!
//! let mut buf = Buffer::create(32, Init::Zeroed).unwrap();
//! buf.pack(">IH", &[Value::from(0x1234u32), Value::from(7u16)]).unwrap();
//! buf.seek(0, Whence::Start);
//!
//! let out = buf.unpack(">IH").unwrap();
//! assert_eq!(out.consumed, 6);
//! assert_eq!(out.values, vec![Value::Int(0x1234), Value::Int(7)]);
//! ```

pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod host;

pub use crate::codec::{pack, unpack, Format, Unpacked, Value};
pub use crate::config::{BoundsPolicy, Config, StorageKind};
pub use crate::core::{Buffer, Init, Whence};
pub use crate::error::{Error, Result};
