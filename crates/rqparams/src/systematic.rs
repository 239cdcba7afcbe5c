//! Supported systematic block sizes
//!
//! RaptorQ only defines systematic indices for a discrete set of extended
//! source block sizes K'. The parameter derivation needs to round a symbol
//! count to that set in both directions.
//!
//! # Sources
//!
//! - [`Rfc6330Indices`] (default): the table shipped with the `raptorq` crate

use std::sync::LazyLock;

/// Largest extended source block size defined by RFC 6330
pub const MAX_EXTENDED_SOURCE_SYMBOLS: u32 = 56_403;

/// A monotone set of supported extended source block sizes
pub trait SystematicIndices {
    /// Smallest supported size `>= k`
    ///
    /// Values above the largest supported size return the largest size, so a
    /// result below `k` means `k` is out of range.
    fn ceil(&self, k: u32) -> u32;

    /// Largest supported size `<= k`
    ///
    /// Returns `None` if `k` is below the smallest supported size.
    fn floor(&self, k: u32) -> Option<u32>;
}

impl<S: SystematicIndices + ?Sized> SystematicIndices for &S {
    fn ceil(&self, k: u32) -> u32 {
        (**self).ceil(k)
    }

    fn floor(&self, k: u32) -> Option<u32> {
        (**self).floor(k)
    }
}

static EXTENDED_SOURCE_SYMBOLS: LazyLock<Vec<u32>> = LazyLock::new(|| {
    let mut table = Vec::with_capacity(512);
    let mut k = raptorq::extended_source_block_symbols(1);
    loop {
        table.push(k);
        if k >= MAX_EXTENDED_SOURCE_SYMBOLS {
            break;
        }
        k = raptorq::extended_source_block_symbols(k + 1);
    }
    table
});

/// RFC 6330 extended source block sizes (Table 2)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rfc6330Indices;

impl Rfc6330Indices {
    /// All supported sizes in ascending order
    #[must_use]
    pub fn sizes(&self) -> &'static [u32] {
        &EXTENDED_SOURCE_SYMBOLS
    }
}

impl SystematicIndices for Rfc6330Indices {
    fn ceil(&self, k: u32) -> u32 {
        let sizes = self.sizes();
        let idx = sizes.partition_point(|&size| size < k);
        sizes[idx.min(sizes.len() - 1)]
    }

    fn floor(&self, k: u32) -> Option<u32> {
        let sizes = self.sizes();
        let idx = sizes.partition_point(|&size| size <= k);
        idx.checked_sub(1).map(|i| sizes[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let sizes = Rfc6330Indices.sizes();
        assert_eq!(&sizes[..6], &[10, 12, 18, 20, 26, 30]);
        assert_eq!(sizes.last(), Some(&MAX_EXTENDED_SOURCE_SYMBOLS));
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ceil() {
        let idx = Rfc6330Indices;
        assert_eq!(idx.ceil(0), 10);
        assert_eq!(idx.ceil(1), 10);
        assert_eq!(idx.ceil(10), 10);
        assert_eq!(idx.ceil(11), 12);
        assert_eq!(idx.ceil(13), 18);
        assert_eq!(idx.ceil(MAX_EXTENDED_SOURCE_SYMBOLS), MAX_EXTENDED_SOURCE_SYMBOLS);
        // clamped
        assert_eq!(idx.ceil(MAX_EXTENDED_SOURCE_SYMBOLS + 1), MAX_EXTENDED_SOURCE_SYMBOLS);
        assert_eq!(idx.ceil(u32::MAX), MAX_EXTENDED_SOURCE_SYMBOLS);
    }

    #[test]
    fn test_floor() {
        let idx = Rfc6330Indices;
        assert_eq!(idx.floor(0), None);
        assert_eq!(idx.floor(9), None);
        assert_eq!(idx.floor(10), Some(10));
        assert_eq!(idx.floor(11), Some(10));
        assert_eq!(idx.floor(17), Some(12));
        assert_eq!(idx.floor(u32::MAX), Some(MAX_EXTENDED_SOURCE_SYMBOLS));
    }

    #[test]
    fn test_matches_raptorq() {
        let idx = Rfc6330Indices;
        for k in (1..=MAX_EXTENDED_SOURCE_SYMBOLS).step_by(97) {
            assert_eq!(idx.ceil(k), raptorq::extended_source_block_symbols(k));
        }
    }

    #[test]
    fn test_floor_ceil_bracket() {
        let idx = Rfc6330Indices;
        for k in 10..2_000 {
            let lo = idx.floor(k).unwrap();
            let hi = idx.ceil(k);
            assert!(lo <= k && k <= hi);
            assert_eq!(lo == hi, idx.sizes().binary_search(&k).is_ok());
        }
    }
}
