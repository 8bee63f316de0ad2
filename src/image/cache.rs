// Full-precision ciphertext store
// The display image keeps only c mod 256; decryption reads from here instead

use crate::error::{Error, Result};
use crate::rsa::RsaBigInt;

/// Full-precision ciphertext for one pixel: red, green, blue
pub type CipherTriple = [RsaBigInt; 3];

/// Ciphertext samples for every pixel of one encrypted image.
///
/// Sized to the image that produced it. A lookup outside that extent, or in
/// a cleared cache, fails with [`Error::CoordinateOutOfCache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiphertextCache {
    rows: usize,
    cols: usize,
    entries: Vec<CipherTriple>,
}

impl CiphertextCache {
    pub(crate) fn new(rows: usize, cols: usize, entries: Vec<CipherTriple>) -> Self {
        debug_assert_eq!(entries.len(), rows * cols);
        Self { rows, cols, entries }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ciphertext triple stored for `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Result<&CipherTriple> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::CoordinateOutOfCache { row, col });
        }
        Ok(&self.entries[row * self.cols + col])
    }

    /// Check that every pixel of a `rows x cols` extent has an entry.
    ///
    /// Reports the first missing coordinate in row-major order.
    pub fn covers(&self, rows: usize, cols: usize) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Ok(());
        }
        if cols > self.cols {
            return Err(Error::CoordinateOutOfCache { row: 0, col: self.cols });
        }
        if rows > self.rows {
            return Err(Error::CoordinateOutOfCache { row: self.rows, col: 0 });
        }
        Ok(())
    }

    /// Drop every entry. Subsequent lookups fail.
    pub fn clear(&mut self) {
        self.rows = 0;
        self.cols = 0;
        self.entries = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    fn triple(v: u64) -> CipherTriple {
        [from_u64(v), from_u64(v + 1), from_u64(v + 2)]
    }

    #[test]
    fn test_lookup() {
        let cache = CiphertextCache::new(1, 2, vec![triple(300), triple(400)]);
        assert_eq!(cache.get(0, 1).unwrap(), &triple(400));
        assert_eq!(cache.get(1, 0), Err(Error::CoordinateOutOfCache { row: 1, col: 0 }));
        assert_eq!(cache.get(0, 2), Err(Error::CoordinateOutOfCache { row: 0, col: 2 }));
    }

    #[test]
    fn test_covers() {
        let cache = CiphertextCache::new(2, 1, vec![triple(300), triple(400)]);
        assert!(cache.covers(2, 1).is_ok());
        assert!(cache.covers(1, 1).is_ok());
        assert!(cache.covers(0, 5).is_ok());
        assert_eq!(cache.covers(2, 2), Err(Error::CoordinateOutOfCache { row: 0, col: 1 }));
        assert_eq!(cache.covers(3, 1), Err(Error::CoordinateOutOfCache { row: 2, col: 0 }));
    }

    #[test]
    fn test_clear() {
        let mut cache = CiphertextCache::new(1, 1, vec![triple(1000)]);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(0, 0), Err(Error::CoordinateOutOfCache { row: 0, col: 0 }));
        assert_eq!(cache.covers(1, 1), Err(Error::CoordinateOutOfCache { row: 0, col: 0 }));
    }
}
