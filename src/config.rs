//! Konfigurasi buffer: bounds policy dan strategi alokasi storage

/// Perilaku akses index di luar `[0, capacity)` lewat host surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// No-op / tidak ada hasil (perilaku kompatibel)
    #[default]
    Lenient,
    /// Error `IndexOutOfBounds`
    Strict,
}

/// Strategi alokasi backing storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// `Box<[u8]>` di heap
    #[default]
    Heap,
    /// Anonymous memory map (memmap2)
    Mapped,
}

/// Konfigurasi untuk pembuatan buffer dan host handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub bounds: BoundsPolicy,
    pub storage: StorageKind,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    #[inline(always)]
    pub fn is_strict(&self) -> bool {
        self.bounds == BoundsPolicy::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient_heap() {
        let config = Config::default();
        assert_eq!(config.bounds, BoundsPolicy::Lenient);
        assert_eq!(config.storage, StorageKind::Heap);
        assert!(!config.is_strict());
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .with_bounds(BoundsPolicy::Strict)
            .with_storage(StorageKind::Mapped);
        assert!(config.is_strict());
        assert_eq!(config.storage, StorageKind::Mapped);
    }
}
