//! Pack: serialize values ke Buffer sesuai format
//!
//! Best-effort: berhenti diam-diam begitu buffer penuh.
//! Format dan value diperiksa dulu sebelum ada byte yang ditulis.

use super::directive::{Code, Directive, Format};
use super::value::Value;
use crate::core::Buffer;
use crate::error::{Error, Result};

impl Format {
    /// Pastikan `values` cukup dan jenisnya cocok dengan directive
    ///
    /// Value ekstra di belakang diabaikan.
    pub fn check_values(&self, values: &[Value]) -> Result<()> {
        let mut index = 0;
        for directive in self.directives() {
            let Directive::Data { code, repeat } = *directive else {
                continue;
            };
            for _ in 0..repeat {
                let value = values.get(index).ok_or(Error::MissingValue {
                    directive: code.as_char(),
                    index,
                })?;
                if !code.accepts(value) {
                    return Err(Error::ValueMismatch {
                        directive: code.as_char(),
                        expected: code.expected(),
                        index,
                    });
                }
                index += 1;
            }
        }
        Ok(())
    }

    /// Pack `values` ke `buffer` mulai dari cursor
    ///
    /// Returns total bytes yang benar-benar ditulis (bisa kurang dari
    /// yang diminta format jika kapasitas habis).
    ///
    /// Jumlah value tetap harus lengkap untuk seluruh format, walaupun
    /// buffer akan penuh sebelum semua value terpakai.
    pub fn pack(&self, buffer: &mut Buffer, values: &[Value]) -> Result<usize> {
        self.check_values(values)?;

        let mut swap = false;
        let mut written = 0usize;
        let mut args = values.iter();

        'directives: for directive in self.directives() {
            let (code, repeat) = match *directive {
                Directive::Endian(endian) => {
                    swap = endian.swaps();
                    continue;
                }
                Directive::Data { code, repeat } => (code, repeat),
            };

            for _ in 0..repeat {
                if buffer.remaining() == 0 {
                    tracing::debug!(written, "pack stopped: buffer full");
                    break 'directives;
                }
                let Some(value) = args.next() else {
                    break 'directives;
                };

                written += match (code, value) {
                    (Code::String, Value::Bytes(bytes)) => buffer.write(bytes),
                    _ => {
                        let (raw, width) = code.encode(value, swap);
                        buffer.write(&raw[..width])
                    }
                };
            }
        }

        Ok(written)
    }
}

/// Parse `format` lalu pack `values` ke `buffer`
pub fn pack(buffer: &mut Buffer, format: &str, values: &[Value]) -> Result<usize> {
    Format::parse(format)?.pack(buffer, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Init, Whence};

    #[test]
    fn test_pack_big_endian() {
        let mut buf = Buffer::create(20, Init::Zeroed).unwrap();
        let values = [
            Value::from(0x1234u32),
            Value::from(0x4567u32),
            Value::from(0x12u16),
            Value::from("abcdefg"),
        ];
        let written = pack(&mut buf, ">IIHA", &values).unwrap();
        assert_eq!(written, 17);
        assert_eq!(
            &buf.as_bytes()[..17],
            b"\x00\x00\x12\x34\x00\x00\x45\x67\x00\x12abcdefg"
        );
    }

    #[test]
    fn test_pack_repeat_string_consumes_many_values() {
        let mut buf = Buffer::create(16, Init::Zeroed).unwrap();
        let values = [Value::from("ab"), Value::from("cde")];
        assert_eq!(pack(&mut buf, "A2", &values).unwrap(), 5);
        assert_eq!(&buf.as_bytes()[..5], b"abcde");
    }

    #[test]
    fn test_pack_truncates_when_full() {
        let mut buf = Buffer::create(6, Init::Zeroed).unwrap();
        let values = [Value::from(1u32), Value::from(2u32), Value::from(3u32)];
        assert_eq!(pack(&mut buf, "<I3", &values).unwrap(), 6);
        assert_eq!(buf.cursor(), 6);
        assert_eq!(buf.as_bytes(), &[1, 0, 0, 0, 2, 0]);
    }

    #[test]
    fn test_pack_bad_code_writes_nothing() {
        let mut buf = Buffer::create(8, Init::Zeroed).unwrap();
        let err = pack(&mut buf, "bZ", &[Value::Int(1)]).unwrap_err();
        assert_eq!(
            err,
            Error::BadCode {
                code: 'Z',
                position: 1
            }
        );
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn test_pack_value_errors() {
        let mut buf = Buffer::create(8, Init::Zeroed).unwrap();
        assert_eq!(
            pack(&mut buf, "bb", &[Value::Int(1)]),
            Err(Error::MissingValue {
                directive: 'b',
                index: 1
            })
        );
        assert_eq!(
            pack(&mut buf, "A", &[Value::Int(1)]),
            Err(Error::ValueMismatch {
                directive: 'A',
                expected: "a byte string",
                index: 0
            })
        );
        assert!(pack(&mut buf, "i", &[Value::from("1")]).is_err());
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn test_pack_coercion() {
        let mut buf = Buffer::create(16, Init::Zeroed).unwrap();
        let values = [Value::Int(0x1FF), Value::Float(-2.7), Value::Int(3)];
        assert_eq!(pack(&mut buf, "<bcd", &values).unwrap(), 10);
        buf.seek(0, Whence::Start);
        assert_eq!(buf.read_u8(), Some(0xFF));
        assert_eq!(buf.read_i8(), Some(-2));
        assert_eq!(buf.read(8), 3.0f64.to_le_bytes());
    }

    #[test]
    fn test_pack_arity_checked_even_when_buffer_fills() {
        let mut buf = Buffer::create(2, Init::Zeroed).unwrap();
        assert_eq!(
            pack(&mut buf, "b4", &[Value::Int(1), Value::Int(2)]),
            Err(Error::MissingValue {
                directive: 'b',
                index: 2
            })
        );
        assert_eq!(buf.as_bytes(), &[0, 0]);
    }

    #[test]
    fn test_pack_ignores_extra_values() {
        let mut buf = Buffer::create(4, Init::Zeroed).unwrap();
        let values = [Value::Int(7), Value::Int(8)];
        assert_eq!(pack(&mut buf, "b", &values).unwrap(), 1);
        assert_eq!(buf.cursor(), 1);
    }
}
