//! Derivation formulas from RFC 6330 section 4.4.1.2
//!
//! Pure functions over the logical parameters. None of them validate their
//! inputs; the checker is responsible for calling them with bounded values.

use crate::systematic::SystematicIndices;

/// Total number of symbols `ceil(F / T)` without narrowing
///
/// `symbol_size` must be non-zero.
#[must_use]
pub fn possible_total_symbols(data_len: u64, symbol_size: u16) -> u64 {
    data_len.div_ceil(u64::from(symbol_size))
}

/// Total number of symbols `Kt = ceil(F / T)`
///
/// Requires `possible_total_symbols(F, T)` to fit a `u32`, which holds for
/// every pair whose total does not exceed the scheme's Kt maximum.
#[must_use]
pub fn total_symbols(data_len: u64, symbol_size: u16) -> u32 {
    let kt = possible_total_symbols(data_len, symbol_size);
    debug_assert!(
        u32::try_from(kt).is_ok(),
        "total symbols {kt} for F={data_len}, T={symbol_size} overflow u32"
    );
    u32::try_from(kt).unwrap_or(u32::MAX)
}

/// Sub-symbol size `Al * ceil(T / (Al * n))`
///
/// The result is a multiple of `Al` and may exceed `u16::MAX` when `T` is
/// not aligned. `al` and `n` must be non-zero.
#[must_use]
pub fn sub_symbol_size(symbol_size: u16, al: u8, n: u16) -> u32 {
    let al = u32::from(al);
    al * u32::from(symbol_size).div_ceil(al * u32::from(n))
}

/// Interleaver length giving sub-symbols of `SS * Al` octets
///
/// `floor(T / (SS * Al))`, at least 1.
#[must_use]
pub fn top_interleaver_length(symbol_size: u16, al: u8, sub_symbol_factor: u16) -> u16 {
    let unit = u32::from(sub_symbol_factor) * u32::from(al);
    let n = u32::from(symbol_size) / unit.max(1);
    u16::try_from(n).unwrap_or(u16::MAX).max(1)
}

/// Working memory needed to decode a block of `K'` symbols with `n` sub-blocks
///
/// `K'` is rounded up to a supported systematic size first.
#[must_use]
pub fn min_working_memory<S: SystematicIndices>(
    indices: &S,
    k_prime: u32,
    symbol_size: u16,
    al: u8,
    n: u16,
) -> u64 {
    u64::from(indices.ceil(k_prime)) * u64::from(sub_symbol_size(symbol_size, al, n))
}

/// Largest supported block size whose sub-blocks fit in `WS` octets (`KL(n)`)
///
/// Capped at `max_source_symbols` and rounded down to a supported systematic
/// size. Returns 0 when not even the smallest supported size fits.
#[must_use]
pub fn max_source_symbols_for_memory<S: SystematicIndices>(
    indices: &S,
    decoding_block_size: u64,
    symbol_size: u16,
    al: u8,
    n: u16,
    max_source_symbols: u32,
) -> u32 {
    let fit = decoding_block_size / u64::from(sub_symbol_size(symbol_size, al, n));
    let upper = u32::try_from(fit)
        .unwrap_or(u32::MAX)
        .min(max_source_symbols);
    indices.floor(upper).unwrap_or(0)
}
