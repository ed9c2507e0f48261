//! Unpack: deserialize values dari region buffer yang belum dibaca
//!
//! Decode memakai offset lokal di atas `[cursor, capacity)`. Begitu satu
//! directive tidak muat, proses berhenti (bukan error) dan cursor buffer
//! maju sebanyak bytes yang sudah berhasil dikonsumsi.

use super::directive::{Code, Directive, Format};
use super::value::Value;
use crate::core::{Buffer, Whence};
use crate::error::Result;

/// Hasil unpack
///
/// `values.len()` tidak berhubungan dengan `consumed`: `A0` menghasilkan
/// value kosong tanpa mengkonsumsi byte.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unpacked {
    /// Bytes yang berhasil dikonsumsi
    pub consumed: usize,
    /// Value yang berhasil di-decode, berurutan
    pub values: Vec<Value>,
}

impl Unpacked {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Format {
    /// Decode dari `src` tanpa menyentuh buffer
    pub fn decode(&self, src: &[u8]) -> Unpacked {
        let mut swap = false;
        let mut i = 0usize;
        let mut values = Vec::new();

        'directives: for directive in self.directives() {
            let (code, repeat) = match *directive {
                Directive::Endian(endian) => {
                    swap = endian.swaps();
                    continue;
                }
                Directive::Data { code, repeat } => (code, repeat),
            };

            if code == Code::String {
                // `A<N>` = satu string sepanjang N bytes
                if repeat == 0 {
                    values.push(Value::Bytes(Vec::new()));
                    continue;
                }
                match i.checked_add(repeat) {
                    Some(end) if end <= src.len() => {
                        values.push(Value::Bytes(src[i..end].to_vec()));
                        i = end;
                    }
                    _ => {
                        tracing::debug!(consumed = i, want = repeat, "unpack stopped: short string");
                        break 'directives;
                    }
                }
                continue;
            }

            let width = code.width().unwrap_or(0);
            for _ in 0..repeat {
                if src.len() - i < width {
                    tracing::debug!(consumed = i, code = %code.as_char(), "unpack stopped: short data");
                    break 'directives;
                }
                values.push(code.decode(&src[i..i + width], swap));
                i += width;
            }
        }

        Unpacked {
            consumed: i,
            values,
        }
    }

    /// Unpack dari cursor `buffer`, lalu majukan cursor sebanyak `consumed`
    pub fn unpack(&self, buffer: &mut Buffer) -> Unpacked {
        let unpacked = self.decode(buffer.unread());
        buffer.seek(unpacked.consumed as i64, Whence::Current);
        unpacked
    }
}

/// Parse `format` lalu unpack dari `buffer`
///
/// Error hanya untuk format string yang rusak; data yang kurang
/// menghentikan proses tanpa error.
pub fn unpack(buffer: &mut Buffer, format: &str) -> Result<Unpacked> {
    Ok(Format::parse(format)?.unpack(buffer))
}
