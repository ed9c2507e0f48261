//! Backing storage untuk Buffer
//!
//! Dialokasi sekali saat create, ukuran tetap, tidak pernah re-alloc.
//! - Heap: `Box<[u8]>`, alokasi via `try_reserve_exact` supaya gagal alokasi
//!   menjadi error, bukan abort
//! - Mapped: anonymous mmap, halaman di-manage kernel

use memmap2::{MmapMut, MmapOptions};
use std::ops::{Deref, DerefMut};

use crate::config::StorageKind;
use crate::error::{Error, Result};

/// Region byte milik satu Buffer
pub enum Storage {
    Heap(Box<[u8]>),
    Mapped(MmapMut),
}

impl Storage {
    /// Alokasi `capacity` bytes, semua diisi `fill`
    ///
    /// Caller menjamin `capacity > 0`.
    pub fn allocate(kind: StorageKind, capacity: usize, fill: u8) -> Result<Self> {
        match kind {
            StorageKind::Heap => {
                let mut bytes = Vec::new();
                bytes
                    .try_reserve_exact(capacity)
                    .map_err(|_| Error::OutOfMemory { capacity })?;
                bytes.resize(capacity, fill);
                Ok(Storage::Heap(bytes.into_boxed_slice()))
            }
            StorageKind::Mapped => {
                let mut mmap = MmapOptions::new()
                    .len(capacity)
                    .map_anon()
                    .map_err(|e| {
                        tracing::debug!(capacity, error = %e, "anonymous map failed");
                        Error::OutOfMemory { capacity }
                    })?;
                // Anonymous map sudah zero-filled oleh kernel
                if fill != 0 {
                    mmap.fill(fill);
                }
                Ok(Storage::Mapped(mmap))
            }
        }
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Storage::Heap(_) => StorageKind::Heap,
            Storage::Mapped(_) => StorageKind::Mapped,
        }
    }
}

impl Deref for Storage {
    type Target = [u8];

    #[inline(always)]
    fn deref(&self) -> &[u8] {
        match self {
            Storage::Heap(bytes) => bytes,
            Storage::Mapped(mmap) => mmap,
        }
    }
}

impl DerefMut for Storage {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [u8] {
        match self {
            Storage::Heap(bytes) => bytes,
            Storage::Mapped(mmap) => mmap,
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .finish()
    }
}
