//! Scalar types dengan lebar tetap (1/2/4/8 bytes)
//!
//! Dipakai oleh typed accessor Buffer dan oleh codec.

/// Scalar yang bisa dibaca/ditulis sebagai raw bytes
pub trait Scalar: Copy {
    /// Lebar dalam bytes, sama di semua platform
    const WIDTH: usize;

    /// Raw representation (`[u8; WIDTH]`)
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    fn to_ne(self) -> Self::Bytes;
    fn from_ne(bytes: Self::Bytes) -> Self;

    /// Decode dari slice sepanjang tepat `WIDTH`
    #[inline(always)]
    fn from_ne_slice(src: &[u8]) -> Self {
        let mut raw = Self::Bytes::default();
        raw.as_mut().copy_from_slice(src);
        Self::from_ne(raw)
    }
}

macro_rules! impl_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();
                type Bytes = [u8; std::mem::size_of::<$t>()];

                #[inline(always)]
                fn to_ne(self) -> Self::Bytes {
                    self.to_ne_bytes()
                }

                #[inline(always)]
                fn from_ne(bytes: Self::Bytes) -> Self {
                    <$t>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_scalar!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);
