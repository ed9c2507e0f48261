//! Fixed-Capacity Byte Buffer dengan cursor
//!
//! Semua operasi yang menggerakkan cursor melakukan bounds check dulu,
//! lalu update cursor sebelum return. Invariant: `0 <= cursor <= capacity`.
//! Operasi yang kehabisan ruang di-clamp (truncate), tidak error.

use super::scalar::Scalar;
use super::storage::Storage;
use crate::config::{Config, StorageKind};
use crate::error::{Error, Result};

/// Isi awal buffer saat create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Init<'a> {
    /// Zero-filled, cursor di 0
    #[default]
    Zeroed,
    /// Semua byte = `fill mod 256`, cursor di 0
    Fill(i64),
    /// Copy string (truncate ke capacity), cursor tepat setelah data
    Bytes(&'a [u8]),
}

/// Basis untuk `seek`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

impl Whence {
    pub const SEEK_SET: i64 = 0;
    pub const SEEK_CUR: i64 = 1;
    pub const SEEK_END: i64 = 2;

    #[inline(always)]
    pub fn from_raw(v: i64) -> Option<Self> {
        match v {
            Self::SEEK_SET => Some(Self::Start),
            Self::SEEK_CUR => Some(Self::Current),
            Self::SEEK_END => Some(Self::End),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i64 {
        match self {
            Self::Start => Self::SEEK_SET,
            Self::Current => Self::SEEK_CUR,
            Self::End => Self::SEEK_END,
        }
    }
}

/// Byte buffer dengan kapasitas tetap
///
/// Storage dialokasi sekali di `create` dan dilepas saat drop.
#[derive(Debug)]
pub struct Buffer {
    storage: Storage,
    cursor: usize,
}

impl Buffer {
    /// Membuat buffer di heap
    pub fn create(capacity: usize, init: Init<'_>) -> Result<Self> {
        Self::with_storage(StorageKind::Heap, capacity, init)
    }

    /// Membuat buffer sesuai `config.storage`
    pub fn with_config(capacity: usize, init: Init<'_>, config: &Config) -> Result<Self> {
        Self::with_storage(config.storage, capacity, init)
    }

    /// Membuat buffer dengan strategi storage tertentu
    ///
    /// Gagal dengan `InvalidCapacity` jika `capacity == 0`,
    /// `OutOfMemory` jika alokasi gagal.
    pub fn with_storage(kind: StorageKind, capacity: usize, init: Init<'_>) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(0));
        }

        // mod 256, negatif ikut wrap
        let fill = match init {
            Init::Fill(v) => v as u8,
            _ => 0,
        };
        let mut storage = Storage::allocate(kind, capacity, fill)?;

        let mut cursor = 0;
        if let Init::Bytes(data) = init {
            let len = data.len().min(capacity);
            storage[..len].copy_from_slice(&data[..len]);
            cursor = len;
        }

        Ok(Self { storage, cursor })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sisa ruang dari cursor sampai akhir
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    /// Seluruh isi storage (independen dari cursor)
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    /// Region yang belum dibaca: `[cursor, capacity)`
    #[inline(always)]
    pub fn unread(&self) -> &[u8] {
        &self.storage[self.cursor..]
    }

    /// Tulis bytes di cursor, truncate ke sisa ruang
    ///
    /// Returns jumlah byte yang benar-benar ditulis.
    #[inline]
    pub fn write(&mut self, data: &[u8]) -> usize {
        let len = data.len().min(self.remaining());
        if len < data.len() {
            tracing::trace!(requested = data.len(), written = len, "write truncated");
        }
        let start = self.cursor;
        self.storage[start..start + len].copy_from_slice(&data[..len]);
        self.cursor += len;
        len
    }

    /// Tulis sederet integer, masing-masing satu byte (`mod 256`)
    ///
    /// Berhenti begitu cursor mencapai capacity.
    pub fn write_ints<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = i64>,
    {
        let mut written = 0;
        for value in values {
            if self.cursor >= self.capacity() {
                break;
            }
            self.storage[self.cursor] = value as u8;
            self.cursor += 1;
            written += 1;
        }
        written
    }

    /// Baca sampai `n` bytes dari cursor (di-clip ke sisa data)
    #[inline]
    pub fn read(&mut self, n: usize) -> Vec<u8> {
        let len = n.min(self.remaining());
        if len == 0 {
            return Vec::new();
        }
        let start = self.cursor;
        self.cursor += len;
        self.storage[start..start + len].to_vec()
    }

    /// Pindahkan cursor, hasil di-clamp ke `[0, capacity]`
    ///
    /// Returns posisi cursor yang baru.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> usize {
        let capacity = self.capacity() as i64;
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.cursor as i64,
            Whence::End => capacity,
        };
        let target = base.saturating_add(offset).clamp(0, capacity);
        self.cursor = target as usize;
        self.cursor
    }

    /// Raw byte di offset absolut; `None` jika di luar `[0, capacity)`
    #[inline(always)]
    pub fn get(&self, index: i64) -> Option<u8> {
        let i = usize::try_from(index).ok()?;
        self.storage.get(i).copied()
    }

    /// Set raw byte (`value mod 256`); no-op di luar `[0, capacity)`
    ///
    /// Returns `true` jika byte benar-benar ditulis.
    #[inline(always)]
    pub fn set(&mut self, index: i64, value: i64) -> bool {
        match usize::try_from(index)
            .ok()
            .and_then(|i| self.storage.get_mut(i))
        {
            Some(slot) => {
                *slot = value as u8;
                true
            }
            None => false,
        }
    }

    /// Seperti `get`, tapi error jika index di luar bounds
    pub fn try_get(&self, index: i64) -> Result<u8> {
        self.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            capacity: self.capacity(),
        })
    }

    /// Seperti `set`, tapi error jika index di luar bounds
    pub fn try_set(&mut self, index: i64, value: i64) -> Result<()> {
        if self.set(index, value) {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                capacity: self.capacity(),
            })
        }
    }

    /// Copy-free view `[start, start + len)` tanpa clamping
    ///
    /// # Panics
    /// Panic jika `start + len > capacity`. Pakai `checked_slice` untuk
    /// input yang tidak dipercaya.
    #[inline(always)]
    pub fn slice(&self, start: usize, len: usize) -> &[u8] {
        &self.storage[start..start + len]
    }

    /// View `[start, start + len)`, error jika keluar dari storage
    pub fn checked_slice(&self, start: i64, len: i64) -> Result<&[u8]> {
        let out_of_range = Error::SliceOutOfRange {
            start,
            len,
            capacity: self.capacity(),
        };
        let (Ok(s), Ok(l)) = (usize::try_from(start), usize::try_from(len)) else {
            return Err(out_of_range);
        };
        match s.checked_add(l) {
            Some(end) if end <= self.capacity() => Ok(&self.storage[s..end]),
            _ => Err(out_of_range),
        }
    }

    /// Baca scalar di cursor (native byte order)
    ///
    /// `None` jika sisa data kurang dari `T::WIDTH`; cursor tidak bergerak.
    #[inline(always)]
    pub fn read_scalar<T: Scalar>(&mut self) -> Option<T> {
        if self.remaining() < T::WIDTH {
            return None;
        }
        let start = self.cursor;
        let value = T::from_ne_slice(&self.storage[start..start + T::WIDTH]);
        self.cursor += T::WIDTH;
        Some(value)
    }

    /// Tulis scalar di cursor (native byte order)
    ///
    /// Returns `T::WIDTH`, atau 0 tanpa menyentuh cursor/storage jika
    /// ruang tidak cukup.
    #[inline(always)]
    pub fn write_scalar<T: Scalar>(&mut self, value: T) -> usize {
        if self.remaining() < T::WIDTH {
            return 0;
        }
        let start = self.cursor;
        self.storage[start..start + T::WIDTH].copy_from_slice(value.to_ne().as_ref());
        self.cursor += T::WIDTH;
        T::WIDTH
    }
}

macro_rules! typed_accessors {
    ($($read:ident, $write:ident => $t:ty;)*) => {
        impl Buffer {
            $(
                #[inline(always)]
                pub fn $read(&mut self) -> Option<$t> {
                    self.read_scalar::<$t>()
                }

                #[inline(always)]
                pub fn $write(&mut self, value: $t) -> usize {
                    self.write_scalar(value)
                }
            )*
        }
    };
}

typed_accessors! {
    read_i8, write_i8 => i8;
    read_u8, write_u8 => u8;
    read_i16, write_i16 => i16;
    read_u16, write_u16 => u16;
    read_i32, write_i32 => i32;
    read_u32, write_u32 => u32;
    read_i64, write_i64 => i64;
    read_u64, write_u64 => u64;
    read_f32, write_f32 => f32;
    read_f64, write_f64 => f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_zeroed() {
        let buf = Buffer::create(8, Init::Zeroed).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.as_bytes(), &[0u8; 8]);
    }

    #[test]
    fn test_create_fill_mod_256() {
        let buf = Buffer::create(4, Init::Fill(0x133)).unwrap();
        assert_eq!(buf.as_bytes(), &[0x33; 4]);
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn test_create_bytes_truncated() {
        let buf = Buffer::create(4, Init::Bytes(b"123321")).unwrap();
        assert_eq!(buf.as_bytes(), b"1233");
        assert_eq!(buf.cursor(), 4);

        let buf = Buffer::create(8, Init::Bytes(b"abc")).unwrap();
        assert_eq!(buf.cursor(), 3);
        assert_eq!(&buf.as_bytes()[..4], b"abc\0");
    }

    #[test]
    fn test_create_zero_capacity() {
        assert_eq!(
            Buffer::create(0, Init::Zeroed).unwrap_err(),
            Error::InvalidCapacity(0)
        );
    }

    #[test]
    fn test_write_truncates() {
        let mut buf = Buffer::create(4, Init::Zeroed).unwrap();
        assert_eq!(buf.write(b"ab"), 2);
        assert_eq!(buf.write(b"cdef"), 2);
        assert_eq!(buf.cursor(), 4);
        assert_eq!(buf.write(b"g"), 0);
        assert_eq!(buf.as_bytes(), b"abcd");
    }

    #[test]
    fn test_write_ints_stops_at_capacity() {
        let mut buf = Buffer::create(3, Init::Zeroed).unwrap();
        assert_eq!(buf.write_ints([0x1a, 0x130, -1, 0x32]), 3);
        assert_eq!(buf.as_bytes(), &[0x1a, 0x30, 0xff]);
    }

    #[test]
    fn test_read_clips() {
        let mut buf = Buffer::create(5, Init::Bytes(b"hello")).unwrap();
        buf.seek(0, Whence::Start);
        assert_eq!(buf.read(3), b"hel");
        assert_eq!(buf.read(10), b"lo");
        assert_eq!(buf.cursor(), 5);
        assert!(buf.read(1).is_empty());
    }

    #[test]
    fn test_seek_clamps() {
        let mut buf = Buffer::create(10, Init::Zeroed).unwrap();
        assert_eq!(buf.seek(4, Whence::Start), 4);
        assert_eq!(buf.seek(3, Whence::Current), 7);
        assert_eq!(buf.seek(-3, Whence::End), 7);
        assert_eq!(buf.seek(-20, Whence::End), 0);
        assert_eq!(buf.seek(5, Whence::End), 10);
        assert_eq!(buf.seek(i64::MAX, Whence::Current), 10);
        assert_eq!(buf.seek(i64::MIN, Whence::Current), 0);
    }

    #[test]
    fn test_whence_raw() {
        assert_eq!(Whence::from_raw(0), Some(Whence::Start));
        assert_eq!(Whence::from_raw(2), Some(Whence::End));
        assert_eq!(Whence::from_raw(3), None);
        assert_eq!(Whence::Current.as_raw(), 1);
    }

    #[test]
    fn test_index_access_fail_soft() {
        let mut buf = Buffer::create(4, Init::Zeroed).unwrap();
        assert!(buf.set(0, 0x1c8));
        assert_eq!(buf.get(0), Some(0xc8));
        assert!(!buf.set(4, 1));
        assert!(!buf.set(-1, 1));
        assert_eq!(buf.get(4), None);
        assert_eq!(buf.get(-1), None);
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn test_index_access_checked() {
        let mut buf = Buffer::create(2, Init::Zeroed).unwrap();
        assert_eq!(buf.try_set(1, 7), Ok(()));
        assert_eq!(buf.try_get(1), Ok(7));
        assert_eq!(
            buf.try_get(2),
            Err(Error::IndexOutOfBounds {
                index: 2,
                capacity: 2
            })
        );
        assert!(buf.try_set(-1, 0).is_err());
    }

    #[test]
    fn test_slice() {
        let buf = Buffer::create(6, Init::Bytes(b"abcdef")).unwrap();
        assert_eq!(buf.slice(1, 3), b"bcd");
        assert_eq!(buf.checked_slice(0, 6).unwrap(), b"abcdef");
        assert!(buf.checked_slice(4, 3).is_err());
        assert!(buf.checked_slice(-1, 2).is_err());
        assert!(buf.checked_slice(0, -1).is_err());
    }

    #[test]
    #[should_panic]
    fn test_unchecked_slice_panics_out_of_range() {
        let buf = Buffer::create(4, Init::Zeroed).unwrap();
        let _ = buf.slice(2, 3);
    }

    #[test]
    fn test_typed_roundtrip_native() {
        let mut buf = Buffer::create(32, Init::Zeroed).unwrap();
        assert_eq!(buf.write_i8(-5), 1);
        assert_eq!(buf.write_u16(0xBEEF), 2);
        assert_eq!(buf.write_i32(-123_456), 4);
        assert_eq!(buf.write_f64(1.5), 8);
        assert_eq!(buf.write_u64(u64::MAX), 8);

        buf.seek(0, Whence::Start);
        assert_eq!(buf.read_i8(), Some(-5));
        assert_eq!(buf.read_u16(), Some(0xBEEF));
        assert_eq!(buf.read_i32(), Some(-123_456));
        assert_eq!(buf.read_f64(), Some(1.5));
        assert_eq!(buf.read_u64(), Some(u64::MAX));
        assert_eq!(buf.cursor(), 23);
        assert_eq!(&buf.as_bytes()[1..3], &0xBEEFu16.to_ne_bytes());
    }

    #[test]
    fn test_typed_boundary() {
        let mut buf = Buffer::create(10, Init::Fill(0xAA)).unwrap();
        buf.seek(3, Whence::Start);
        assert_eq!(buf.write_i64(1), 0);
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.as_bytes(), &[0xAA; 10]);

        assert_eq!(buf.read_u64(), None);
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.read_u32(), Some(0xAAAA_AAAA));
    }

    #[test]
    fn test_mapped_buffer() {
        let config = Config::new().with_storage(StorageKind::Mapped);
        let mut buf = Buffer::with_config(16, Init::Bytes(b"map"), &config).unwrap();
        assert_eq!(buf.storage_kind(), StorageKind::Mapped);
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.write(b"ped"), 3);
        assert_eq!(&buf.as_bytes()[..6], b"mapped");
    }
}
