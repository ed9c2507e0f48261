//! Error types untuk zbuff
//!
//! Hanya kondisi yang menandakan bug di sisi caller yang menjadi error:
//! format string rusak, argumen salah, kapasitas invalid, alokasi gagal.
//! Kondisi bounds (buffer penuh, data kurang) di-clamp dan dilaporkan
//! lewat return value.

use thiserror::Error;

/// Error utama untuk semua operasi zbuff
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid capacity: {0} (must be > 0)")]
    InvalidCapacity(i64),
    #[error("memory not enough ({capacity} bytes requested)")]
    OutOfMemory { capacity: usize },
    #[error("bad code `{code}' at position {position}")]
    BadCode { code: char, position: usize },
    #[error("missing value #{index} for directive `{directive}'")]
    MissingValue { directive: char, index: usize },
    #[error("value #{index} for directive `{directive}' must be {expected}")]
    ValueMismatch {
        directive: char,
        expected: &'static str,
        index: usize,
    },
    #[error("invalid whence: {0}")]
    InvalidWhence(i64),
    #[error("index {index} out of bounds (capacity {capacity})")]
    IndexOutOfBounds { index: i64, capacity: usize },
    #[error("slice [{start}, {start}+{len}) out of range (capacity {capacity})")]
    SliceOutOfRange {
        start: i64,
        len: i64,
        capacity: usize,
    },
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("bad argument: {0}")]
    Argument(String),
}

impl Error {
    pub fn argument<S: Into<String>>(msg: S) -> Self {
        Error::Argument(msg.into())
    }

    pub fn unknown_method<S: Into<String>>(name: S) -> Self {
        Error::UnknownMethod(name.into())
    }

    /// True untuk error yang berasal dari format string / argumen codec
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Error::BadCode { .. } | Error::MissingValue { .. } | Error::ValueMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_code_message() {
        let e = Error::BadCode {
            code: 'Z',
            position: 0,
        };
        assert_eq!(format!("{}", e), "bad code `Z' at position 0");
        assert!(e.is_codec_error());
    }

    #[test]
    fn test_out_of_memory_message() {
        let e = Error::OutOfMemory { capacity: 16 };
        assert!(format!("{}", e).starts_with("memory not enough"));
        assert!(!e.is_codec_error());
    }

    #[test]
    fn test_helpers() {
        assert!(matches!(Error::argument("x"), Error::Argument(_)));
        let e = Error::unknown_method("frob");
        assert_eq!(format!("{}", e), "unknown method: frob");
    }
}
