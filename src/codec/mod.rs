//! Codec Layer: format-driven binary pack/unpack
//!
//! Prinsip desain:
//! - Stateless: hanya bekerja lewat kontrak publik Buffer (write/unread/seek)
//! - Fixed widths: setiap kode punya lebar tetap, portable antar platform
//! - Explicit endianness: `<`, `>`, `=` berlaku untuk directive berikutnya

mod directive;
mod pack;
mod unpack;
mod value;

pub use directive::{Code, Directive, Endian, Format};
pub use pack::pack;
pub use unpack::{unpack, Unpacked};
pub use value::Value;

use crate::core::Buffer;
use crate::error::Result;

impl Buffer {
    /// Shortcut untuk [`pack`]
    pub fn pack(&mut self, format: &str, values: &[Value]) -> Result<usize> {
        pack(self, format, values)
    }

    /// Shortcut untuk [`unpack`]
    pub fn unpack(&mut self, format: &str) -> Result<Unpacked> {
        unpack(self, format)
    }
}
