//! Format directives
//!
//! Tabel kode (lebar tetap di semua platform):
//! ```text
//! A  bytes/string        c  i8     b  u8
//! f  f32                 h  i16    H  u16
//! d  f64                 i  i32    I  u32
//! n  native number (f64) l  i64    L  u64
//! <  little endian       >  big endian      =  native
//! ```
//! Digit setelah kode = repeat count (default 1). Spasi dan koma diabaikan.

use super::value::Value;
use crate::core::Scalar;
use crate::error::{Error, Result};

/// Kode data dalam format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    String,
    Float,
    Double,
    Number,
    Char,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
}

impl Code {
    #[inline(always)]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::String),
            'f' => Some(Self::Float),
            'd' => Some(Self::Double),
            'n' => Some(Self::Number),
            'c' => Some(Self::Char),
            'b' => Some(Self::Byte),
            'h' => Some(Self::Short),
            'H' => Some(Self::UShort),
            'i' => Some(Self::Int),
            'I' => Some(Self::UInt),
            'l' => Some(Self::Long),
            'L' => Some(Self::ULong),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::String => 'A',
            Self::Float => 'f',
            Self::Double => 'd',
            Self::Number => 'n',
            Self::Char => 'c',
            Self::Byte => 'b',
            Self::Short => 'h',
            Self::UShort => 'H',
            Self::Int => 'i',
            Self::UInt => 'I',
            Self::Long => 'l',
            Self::ULong => 'L',
        }
    }

    /// Lebar dalam bytes; `None` untuk `A` (panjang variabel)
    pub fn width(self) -> Option<usize> {
        match self {
            Self::String => None,
            Self::Char => Some(i8::WIDTH),
            Self::Byte => Some(u8::WIDTH),
            Self::Short => Some(i16::WIDTH),
            Self::UShort => Some(u16::WIDTH),
            Self::Int => Some(i32::WIDTH),
            Self::UInt => Some(u32::WIDTH),
            Self::Float => Some(f32::WIDTH),
            Self::Long => Some(i64::WIDTH),
            Self::ULong => Some(u64::WIDTH),
            Self::Double => Some(f64::WIDTH),
            Self::Number => Some(f64::WIDTH),
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double | Self::Number)
    }

    /// Jenis value yang diterima kode ini (untuk pesan error)
    pub fn expected(self) -> &'static str {
        match self {
            Self::String => "a byte string",
            _ => "a number",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => matches!(value, Value::Bytes(_)),
            _ => value.is_number(),
        }
    }

    /// Encode value numerik ke raw bytes (`[..width]` valid)
    ///
    /// Dipanggil hanya untuk kode numerik.
    pub(crate) fn encode(self, value: &Value, swap: bool) -> ([u8; 8], usize) {
        match self {
            Self::Char => raw(value.coerce_i64() as i8, swap),
            Self::Byte => raw(value.coerce_i64() as u8, swap),
            Self::Short => raw(value.coerce_i64() as i16, swap),
            Self::UShort => raw(value.coerce_i64() as u16, swap),
            Self::Int => raw(value.coerce_i64() as i32, swap),
            Self::UInt => raw(value.coerce_i64() as u32, swap),
            Self::Long => raw(value.coerce_i64(), swap),
            Self::ULong => raw(value.coerce_i64() as u64, swap),
            Self::Float => raw(value.coerce_f64() as f32, swap),
            Self::Double | Self::Number => raw(value.coerce_f64(), swap),
            Self::String => ([0; 8], 0),
        }
    }

    /// Decode raw bytes (panjang tepat `width`) ke value
    pub(crate) fn decode(self, src: &[u8], swap: bool) -> Value {
        match self {
            Self::Char => Value::Int(cook::<i8>(src, swap) as i64),
            Self::Byte => Value::Int(cook::<u8>(src, swap) as i64),
            Self::Short => Value::Int(cook::<i16>(src, swap) as i64),
            Self::UShort => Value::Int(cook::<u16>(src, swap) as i64),
            Self::Int => Value::Int(cook::<i32>(src, swap) as i64),
            Self::UInt => Value::Int(cook::<u32>(src, swap) as i64),
            Self::Long => Value::Int(cook::<i64>(src, swap)),
            Self::ULong => Value::Int(cook::<u64>(src, swap) as i64),
            Self::Float => Value::Float(cook::<f32>(src, swap) as f64),
            Self::Double | Self::Number => Value::Float(cook::<f64>(src, swap)),
            Self::String => Value::Bytes(src.to_vec()),
        }
    }
}

#[inline(always)]
fn raw<T: Scalar>(v: T, swap: bool) -> ([u8; 8], usize) {
    let mut out = [0u8; 8];
    let bytes = &mut out[..T::WIDTH];
    bytes.copy_from_slice(v.to_ne().as_ref());
    if swap {
        bytes.reverse();
    }
    (out, T::WIDTH)
}

#[inline(always)]
fn cook<T: Scalar>(src: &[u8], swap: bool) -> T {
    let mut bytes = T::Bytes::default();
    bytes.as_mut().copy_from_slice(src);
    if swap {
        bytes.as_mut().reverse();
    }
    T::from_ne(bytes)
}

/// Marker byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
    Native,
}

impl Endian {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Little),
            '>' => Some(Self::Big),
            '=' => Some(Self::Native),
            _ => None,
        }
    }

    /// Apakah byte perlu di-swap relatif terhadap native order host
    #[inline(always)]
    pub fn swaps(self) -> bool {
        match self {
            Self::Little => cfg!(target_endian = "big"),
            Self::Big => cfg!(target_endian = "little"),
            Self::Native => false,
        }
    }
}

/// Satu unit hasil parse format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Endian(Endian),
    Data { code: Code, repeat: usize },
}

/// Format string yang sudah di-parse
///
/// Parse sekali, pakai berkali-kali untuk pack/unpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    directives: Vec<Directive>,
}

impl Format {
    /// Parse format string
    ///
    /// Karakter yang tidak dikenal adalah `BadCode` (bug di sisi caller).
    pub fn parse(format: &str) -> Result<Self> {
        let mut directives = Vec::new();
        let mut chars = format.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            // Repeat count
            let mut repeat: Option<usize> = None;
            while let Some(&(_, d)) = chars.peek() {
                let Some(digit) = d.to_digit(10) else { break };
                let n = repeat.unwrap_or(0);
                repeat = Some(n.saturating_mul(10).saturating_add(digit as usize));
                chars.next();
            }

            if let Some(code) = Code::from_char(c) {
                directives.push(Directive::Data {
                    code,
                    repeat: repeat.unwrap_or(1),
                });
            } else if let Some(endian) = Endian::from_char(c) {
                directives.push(Directive::Endian(endian));
            } else if c == ',' || c.is_ascii_whitespace() {
                continue;
            } else {
                return Err(Error::BadCode { code: c, position });
            }
        }

        tracing::trace!(format, directives = directives.len(), "format parsed");
        Ok(Self { directives })
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Jumlah value yang dikonsumsi `pack`
    pub fn value_count(&self) -> usize {
        self.directives
            .iter()
            .map(|d| match d {
                Directive::Data { repeat, .. } => *repeat,
                Directive::Endian(_) => 0,
            })
            .fold(0usize, usize::saturating_add)
    }

    /// Ukuran bytes untuk bagian numerik (tanpa `A`)
    pub fn fixed_size(&self) -> usize {
        self.directives
            .iter()
            .filter_map(|d| match d {
                Directive::Data { code, repeat } => code.width().map(|w| w.saturating_mul(*repeat)),
                Directive::Endian(_) => None,
            })
            .fold(0usize, usize::saturating_add)
    }
}

impl std::str::FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let format = Format::parse(">IIHA7").unwrap();
        assert_eq!(
            format.directives(),
            &[
                Directive::Endian(Endian::Big),
                Directive::Data {
                    code: Code::UInt,
                    repeat: 1
                },
                Directive::Data {
                    code: Code::UInt,
                    repeat: 1
                },
                Directive::Data {
                    code: Code::UShort,
                    repeat: 1
                },
                Directive::Data {
                    code: Code::String,
                    repeat: 7
                },
            ]
        );
        assert_eq!(format.value_count(), 10);
        assert_eq!(format.fixed_size(), 10);
    }

    #[test]
    fn test_parse_repeat_and_separators() {
        let format = Format::parse("< b12, h3 A0").unwrap();
        assert_eq!(format.directives().len(), 4);
        assert_eq!(
            format.directives()[1],
            Directive::Data {
                code: Code::Byte,
                repeat: 12
            }
        );
        assert_eq!(
            format.directives()[3],
            Directive::Data {
                code: Code::String,
                repeat: 0
            }
        );
    }

    #[test]
    fn test_parse_bad_code() {
        assert_eq!(
            Format::parse("IIZ"),
            Err(Error::BadCode {
                code: 'Z',
                position: 2
            })
        );
        // Digit tanpa kode di depannya juga bad code
        assert!(Format::parse("4I").is_err());
    }

    #[test]
    fn test_long_is_pinned_to_eight_bytes() {
        assert_eq!(Code::Long.width(), Some(8));
        assert_eq!(Code::ULong.width(), Some(8));
        assert_eq!(Code::Number.width(), Some(8));
    }

    #[test]
    fn test_code_char_roundtrip() {
        for c in "AfdncbhHiIlL".chars() {
            assert_eq!(Code::from_char(c).map(Code::as_char), Some(c));
        }
    }

    #[test]
    fn test_encode_decode_swap() {
        let (bytes, width) = Code::UInt.encode(&Value::Int(0x0102_0304), Endian::Big.swaps());
        assert_eq!(&bytes[..width], &[1, 2, 3, 4]);

        let (bytes, width) = Code::UInt.encode(&Value::Int(0x0102_0304), Endian::Little.swaps());
        assert_eq!(&bytes[..width], &[4, 3, 2, 1]);

        let v = Code::Short.decode(&[0xFF, 0xFE], Endian::Big.swaps());
        assert_eq!(v, Value::Int(-2));
    }

    #[test]
    fn test_from_str() {
        let format: Format = "=d".parse().unwrap();
        assert_eq!(format.fixed_size(), 8);
    }
}
