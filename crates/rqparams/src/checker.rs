//! Parameter bounds checker
//!
//! [`ParameterChecker`] exposes the absolute bounds of every FEC parameter,
//! the bounds that follow from fixing another parameter, and the composite
//! predicates that decide whether a full parameter set is legal.
//!
//! Conditional bounds come in two flavours. The checked variant validates
//! its inputs first and fails with an [`Error`] instead of computing a
//! meaningless number. The `*_unchecked` variant is the fast path for
//! callers that already validated, and is what the predicates use
//! internally. The `is_*_out_of_bounds` predicates never fail.
//!
//! # Example
//!
//! ```
//! use rqparams::ParameterChecker;
//!
//! let checker = ParameterChecker::default();
//! assert!(checker.are_valid_parameters(1_000_000, 1024, 1, 1));
//! assert_eq!(checker.min_symbol_size_given(1).unwrap(), checker.min_symbol_size());
//! ```

use crate::error::{Error, Param, Result};
use crate::formulas;
use crate::limits::Limits;
use crate::systematic::{Rfc6330Indices, SystematicIndices};
use tracing::trace;

/// Validator for FEC parameters under a fixed set of [`Limits`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterChecker<S = Rfc6330Indices> {
    limits: Limits,
    indices: S,
}

impl ParameterChecker<Rfc6330Indices> {
    /// Checker for the RaptorQ scheme (RFC 6330)
    pub const RFC_6330: Self = Self {
        limits: Limits::RFC_6330,
        indices: Rfc6330Indices,
    };

    /// Create a checker for custom limits over the RFC 6330 systematic sizes
    pub fn new(limits: Limits) -> Result<Self> {
        Self::with_indices(limits, Rfc6330Indices)
    }
}

impl Default for ParameterChecker<Rfc6330Indices> {
    fn default() -> Self {
        Self::RFC_6330
    }
}

impl<S: SystematicIndices> ParameterChecker<S> {
    /// Create a checker for custom limits and systematic sizes
    ///
    /// The largest block size must itself be a supported systematic size
    /// or lie below one.
    pub fn with_indices(limits: Limits, indices: S) -> Result<Self> {
        limits.validate()?;
        let largest = indices.ceil(limits.max_source_symbols);
        if largest < limits.max_source_symbols {
            return Err(Error::configuration(format!(
                "maximum source symbols {} exceeds the largest systematic size {largest}",
                limits.max_source_symbols
            )));
        }
        Ok(Self { limits, indices })
    }

    /// Get the limits
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Get the supported systematic sizes
    #[must_use]
    pub const fn indices(&self) -> &S {
        &self.indices
    }

    // === Data length (F) ===

    /// Absolute minimum data length
    #[must_use]
    pub const fn min_data_length(&self) -> u64 {
        self.limits.min_data_length
    }

    /// Absolute maximum data length
    #[must_use]
    pub const fn max_data_length(&self) -> u64 {
        self.limits.max_data_length
    }

    #[must_use]
    pub const fn is_data_length_out_of_bounds(&self, data_len: u64) -> bool {
        data_len < self.min_data_length() || data_len > self.max_data_length()
    }

    /// Maximum data length that can be carried with symbols of `symbol_size` octets
    ///
    /// `min(F_max, T * Kt_max)`.
    pub fn max_data_length_given(&self, symbol_size: u16) -> Result<u64> {
        self.check_symbol_size(symbol_size)?;
        Ok(self.max_data_length_given_unchecked(symbol_size))
    }

    #[must_use]
    pub fn max_data_length_given_unchecked(&self, symbol_size: u16) -> u64 {
        let bound = u64::from(symbol_size) * u64::from(self.limits.max_total_symbols);
        self.max_data_length().min(bound)
    }

    /// Maximum data length derivable from a payload length and a decoding memory budget
    ///
    /// The budget must be at least the payload length.
    pub fn max_data_length_given_memory(
        &self,
        payload_len: u16,
        decoding_block_size: u64,
    ) -> Result<u64> {
        self.check_payload_length(payload_len)?;
        self.check_decoding_block_size(decoding_block_size)?;
        if decoding_block_size < u64::from(payload_len) {
            return Err(Error::BelowMinimum {
                param: Param::DecodingBlockSize,
                value: decoding_block_size,
                min: u64::from(payload_len),
                constraint: "payload length",
            });
        }
        Ok(self.max_data_length_given_memory_unchecked(payload_len, decoding_block_size))
    }

    /// `min(max_data_length_given(T), Z_max * KL(n_top) * T)`
    #[must_use]
    pub fn max_data_length_given_memory_unchecked(
        &self,
        symbol_size: u16,
        decoding_block_size: u64,
    ) -> u64 {
        let kl = self.source_symbols_for_memory(
            decoding_block_size,
            symbol_size,
            self.top_interleaver_length(symbol_size),
        );
        let bound = u64::from(self.limits.max_source_blocks)
            .saturating_mul(u64::from(kl))
            .saturating_mul(u64::from(symbol_size));
        self.max_data_length_given_unchecked(symbol_size).min(bound)
    }

    // === Symbol size (T) ===

    /// Absolute minimum symbol size
    #[must_use]
    pub const fn min_symbol_size(&self) -> u16 {
        self.limits.min_symbol_size
    }

    /// Absolute maximum symbol size
    #[must_use]
    pub const fn max_symbol_size(&self) -> u16 {
        self.limits.max_symbol_size
    }

    #[must_use]
    pub const fn is_symbol_size_out_of_bounds(&self, symbol_size: u16) -> bool {
        symbol_size < self.min_symbol_size() || symbol_size > self.max_symbol_size()
    }

    /// Smallest symbol size keeping the total symbol count within bounds
    ///
    /// `max(T_min, ceil(F / Kt_max))`.
    pub fn min_symbol_size_given(&self, data_len: u64) -> Result<u16> {
        self.check_data_length(data_len)?;
        Ok(self.min_symbol_size_given_unchecked(data_len))
    }

    #[must_use]
    pub fn min_symbol_size_given_unchecked(&self, data_len: u64) -> u16 {
        let t = data_len.div_ceil(u64::from(self.limits.max_total_symbols));
        self.min_symbol_size()
            .max(u16::try_from(t).unwrap_or(u16::MAX))
    }

    // === Number of source blocks (Z) ===

    /// Absolute minimum number of source blocks
    #[must_use]
    pub const fn min_source_blocks(&self) -> u16 {
        self.limits.min_source_blocks
    }

    /// Absolute maximum number of source blocks
    #[must_use]
    pub const fn max_source_blocks(&self) -> u16 {
        self.limits.max_source_blocks
    }

    #[must_use]
    pub const fn is_source_blocks_out_of_bounds(&self, num_src_blocks: u16) -> bool {
        num_src_blocks < self.min_source_blocks() || num_src_blocks > self.max_source_blocks()
    }

    /// Fewest source blocks such that no block exceeds K_max symbols
    ///
    /// `max(Z_min, ceil(Kt / K_max))`.
    pub fn min_source_blocks_given(&self, total_symbols: u32) -> Result<u16> {
        self.check_total_symbol_count(total_symbols)?;
        Ok(self.min_source_blocks_given_unchecked(total_symbols))
    }

    #[must_use]
    pub fn min_source_blocks_given_unchecked(&self, total_symbols: u32) -> u16 {
        let z = total_symbols.div_ceil(self.limits.max_source_symbols);
        self.min_source_blocks()
            .max(u16::try_from(z).unwrap_or(u16::MAX))
    }

    /// Most source blocks such that no block is empty
    ///
    /// `min(Z_max, Kt)`.
    pub fn max_source_blocks_given(&self, total_symbols: u32) -> Result<u16> {
        self.check_total_symbol_count(total_symbols)?;
        Ok(self.max_source_blocks_given_unchecked(total_symbols))
    }

    #[must_use]
    pub fn max_source_blocks_given_unchecked(&self, total_symbols: u32) -> u16 {
        let kt = u16::try_from(total_symbols).unwrap_or(u16::MAX);
        self.max_source_blocks().min(kt)
    }

    /// Minimum number of source blocks for a data length and symbol size
    pub fn min_source_blocks_for(&self, data_len: u64, symbol_size: u16) -> Result<u16> {
        let kt = self.checked_total_symbols(data_len, symbol_size)?;
        Ok(self.min_source_blocks_given_unchecked(kt))
    }

    /// Maximum number of source blocks for a data length and symbol size
    pub fn max_source_blocks_for(&self, data_len: u64, symbol_size: u16) -> Result<u16> {
        let kt = self.checked_total_symbols(data_len, symbol_size)?;
        Ok(self.max_source_blocks_given_unchecked(kt))
    }

    // === Interleaver length (N) ===

    /// Absolute minimum interleaver length
    #[must_use]
    pub const fn min_interleaver_length(&self) -> u16 {
        self.limits.min_interleaver_length
    }

    /// Absolute maximum interleaver length
    #[must_use]
    pub const fn max_interleaver_length(&self) -> u16 {
        self.limits.max_interleaver_length
    }

    #[must_use]
    pub const fn is_interleaver_length_out_of_bounds(&self, interleaver_len: u16) -> bool {
        interleaver_len < self.min_interleaver_length()
            || interleaver_len > self.max_interleaver_length()
    }

    /// Largest interleaver length for a symbol size: `min(N_max, T / Al)`
    pub fn max_interleaver_length_given(&self, symbol_size: u16) -> Result<u16> {
        self.check_symbol_size(symbol_size)?;
        Ok(self.max_interleaver_length_given_unchecked(symbol_size))
    }

    #[must_use]
    pub fn max_interleaver_length_given_unchecked(&self, symbol_size: u16) -> u16 {
        self.max_interleaver_length()
            .min(symbol_size / u16::from(self.symbol_alignment()))
    }

    /// Interleaver length used when bounding memory for a symbol size
    ///
    /// `T / (SS * Al)` capped at N_max, and never below 1.
    #[must_use]
    pub fn top_interleaver_length(&self, symbol_size: u16) -> u16 {
        formulas::top_interleaver_length(
            symbol_size,
            self.symbol_alignment(),
            self.limits.sub_symbol_factor,
        )
        .min(self.max_interleaver_length())
    }

    // === Symbol alignment (Al) ===

    /// Fixed symbol alignment of the scheme
    #[must_use]
    pub const fn symbol_alignment(&self) -> u8 {
        self.limits.symbol_alignment
    }

    // === Total symbols (Kt) ===

    /// Maximum total number of source symbols
    #[must_use]
    pub const fn max_total_symbols(&self) -> u32 {
        self.limits.max_total_symbols
    }

    /// Check whether F and T together produce too many symbols
    ///
    /// Uses the non-narrowed symbol count so the comparison cannot overflow.
    #[must_use]
    pub fn is_total_symbols_out_of_bounds(&self, data_len: u64, symbol_size: u16) -> bool {
        symbol_size == 0
            || formulas::possible_total_symbols(data_len, symbol_size)
                > u64::from(self.max_total_symbols())
    }

    /// Total number of symbols for a legal (F, T) pair
    pub fn checked_total_symbols(&self, data_len: u64, symbol_size: u16) -> Result<u32> {
        self.check_data_length(data_len)?;
        self.check_symbol_size(symbol_size)?;
        self.check_total_symbols(data_len, symbol_size)?;
        Ok(formulas::total_symbols(data_len, symbol_size))
    }

    // === Payload length (P) ===

    /// Absolute minimum payload length
    #[must_use]
    pub const fn min_payload_length(&self) -> u16 {
        self.min_symbol_size()
    }

    /// Absolute maximum payload length
    #[must_use]
    pub const fn max_payload_length(&self) -> u16 {
        self.max_symbol_size()
    }

    #[must_use]
    pub const fn is_payload_length_out_of_bounds(&self, payload_len: u16) -> bool {
        payload_len < self.min_payload_length() || payload_len > self.max_payload_length()
    }

    /// Smallest payload length usable to derive parameters for `data_len`
    pub fn min_payload_length_given(&self, data_len: u64) -> Result<u16> {
        self.min_symbol_size_given(data_len)
    }

    // === Decoding block size (WS) ===

    /// Absolute minimum decoding block size
    #[must_use]
    pub fn min_decoding_block_size(&self) -> u64 {
        self.min_decoding_block_size_given_unchecked(self.min_data_length(), self.min_symbol_size())
    }

    #[must_use]
    pub fn is_decoding_block_size_out_of_bounds(&self, decoding_block_size: u64) -> bool {
        decoding_block_size < self.min_decoding_block_size()
    }

    /// Smallest decoding block size usable to derive parameters for (F, P)
    pub fn min_decoding_block_size_given(&self, data_len: u64, payload_len: u16) -> Result<u64> {
        self.check_data_length(data_len)?;
        self.check_payload_length(payload_len)?;
        self.check_total_symbols(data_len, payload_len)?;
        Ok(self.min_decoding_block_size_given_unchecked(data_len, payload_len))
    }

    /// Working memory for the smallest legal block at maximum interleaving
    ///
    /// `K' = max(K'_min, ceil(Kt / Z_max))`, then
    /// `min_working_memory(K', T, Al, top_interleaver_length(T))`.
    #[must_use]
    pub fn min_decoding_block_size_given_unchecked(&self, data_len: u64, symbol_size: u16) -> u64 {
        let kt = formulas::total_symbols(data_len, symbol_size);
        let k_prime = self
            .limits
            .min_extended_source_symbols
            .max(kt.div_ceil(u32::from(self.max_source_blocks())));
        formulas::min_working_memory(
            &self.indices,
            k_prime,
            symbol_size,
            self.symbol_alignment(),
            self.top_interleaver_length(symbol_size),
        )
    }

    /// Largest supported block size fitting `WS` with `n` sub-blocks (`KL(n)`)
    ///
    /// Returns 0 if no supported block size fits.
    #[must_use]
    pub fn source_symbols_for_memory(
        &self,
        decoding_block_size: u64,
        symbol_size: u16,
        interleaver_len: u16,
    ) -> u32 {
        formulas::max_source_symbols_for_memory(
            &self.indices,
            decoding_block_size,
            symbol_size,
            self.symbol_alignment(),
            interleaver_len,
            self.limits.max_source_symbols,
        )
    }

    // === Source symbols per block (K) ===

    /// Absolute minimum number of source symbols per block
    #[must_use]
    pub const fn min_source_symbols_per_block(&self) -> u32 {
        self.limits.min_source_symbols
    }

    /// Absolute maximum number of source symbols per block
    #[must_use]
    pub const fn max_source_symbols_per_block(&self) -> u32 {
        self.limits.max_source_symbols
    }

    #[must_use]
    pub const fn is_source_symbols_per_block_out_of_bounds(&self, num_src_symbols: u32) -> bool {
        num_src_symbols < self.min_source_symbols_per_block()
            || num_src_symbols > self.max_source_symbols_per_block()
    }

    /// Number of repair symbols addressable in a block of `num_src_symbols`
    ///
    /// The ESI space is shared between source and repair symbols.
    pub fn repair_symbols_per_block(&self, num_src_symbols: u32) -> Result<u32> {
        if self.is_source_symbols_per_block_out_of_bounds(num_src_symbols) {
            return Err(Error::out_of_bounds(
                Param::SourceSymbolsPerBlock,
                num_src_symbols,
                self.min_source_symbols_per_block(),
                self.max_source_symbols_per_block(),
            ));
        }
        let esi_space = self.max_encoding_symbol_id() - self.min_encoding_symbol_id() + 1;
        Ok(esi_space.saturating_sub(num_src_symbols))
    }

    // === FEC payload ID (SBN, ESI) ===

    #[must_use]
    pub const fn min_source_block_number(&self) -> u8 {
        self.limits.min_source_block_number
    }

    #[must_use]
    pub const fn max_source_block_number(&self) -> u8 {
        self.limits.max_source_block_number
    }

    #[must_use]
    pub const fn is_source_block_number_out_of_bounds(&self, sbn: u8) -> bool {
        sbn < self.min_source_block_number() || sbn > self.max_source_block_number()
    }

    #[must_use]
    pub const fn min_encoding_symbol_id(&self) -> u32 {
        self.limits.min_encoding_symbol_id
    }

    #[must_use]
    pub const fn max_encoding_symbol_id(&self) -> u32 {
        self.limits.max_encoding_symbol_id
    }

    #[must_use]
    pub const fn is_encoding_symbol_id_out_of_bounds(&self, esi: u32) -> bool {
        esi < self.min_encoding_symbol_id() || esi > self.max_encoding_symbol_id()
    }

    /// Check an (SBN, ESI) pair against an object split into `num_src_blocks` blocks
    pub fn is_valid_payload_id(&self, sbn: u8, esi: u32, num_src_blocks: u16) -> Result<bool> {
        self.check_source_blocks(num_src_blocks)?;
        if self.is_source_block_number_out_of_bounds(sbn) || u16::from(sbn) >= num_src_blocks {
            return Ok(false);
        }
        Ok(!self.is_encoding_symbol_id_out_of_bounds(esi))
    }

    // === Composite predicates ===

    /// Check a full (F, T, Z, N) parameter set
    ///
    /// Fails with the first violated constraint, in this order: absolute
    /// bounds of F, T, Z and N, the total symbol count, Z against the total
    /// symbol count, then N against T.
    pub fn check_parameters(
        &self,
        data_len: u64,
        symbol_size: u16,
        num_src_blocks: u16,
        interleaver_len: u16,
    ) -> Result<()> {
        self.check_data_length(data_len)?;
        self.check_symbol_size(symbol_size)?;
        self.check_source_blocks(num_src_blocks)?;
        self.check_interleaver_length(interleaver_len)?;
        self.check_total_symbols(data_len, symbol_size)?;

        let kt = formulas::total_symbols(data_len, symbol_size);
        let min_z = self.min_source_blocks_given_unchecked(kt);
        if num_src_blocks < min_z {
            return Err(Error::BelowMinimum {
                param: Param::SourceBlocks,
                value: num_src_blocks.into(),
                min: min_z.into(),
                constraint: "total number of symbols",
            });
        }
        let max_z = self.max_source_blocks_given_unchecked(kt);
        if num_src_blocks > max_z {
            return Err(Error::AboveMaximum {
                param: Param::SourceBlocks,
                value: num_src_blocks.into(),
                max: max_z.into(),
                constraint: "total number of symbols",
            });
        }

        let max_n = self.max_interleaver_length_given_unchecked(symbol_size);
        if interleaver_len > max_n {
            return Err(Error::AboveMaximum {
                param: Param::InterleaverLength,
                value: interleaver_len.into(),
                max: max_n.into(),
                constraint: "symbol size",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn are_valid_parameters(
        &self,
        data_len: u64,
        symbol_size: u16,
        num_src_blocks: u16,
        interleaver_len: u16,
    ) -> bool {
        match self.check_parameters(data_len, symbol_size, num_src_blocks, interleaver_len) {
            Ok(()) => true,
            Err(e) => {
                trace!("Rejected FEC parameters: {}", e);
                false
            }
        }
    }

    /// Check the inputs of parameter derivation (F, P, WS)
    pub fn check_deriver_parameters(
        &self,
        data_len: u64,
        payload_len: u16,
        decoding_block_size: u64,
    ) -> Result<()> {
        self.check_data_length(data_len)?;
        self.check_payload_length(payload_len)?;
        self.check_decoding_block_size(decoding_block_size)?;

        let min_t = self.min_symbol_size_given_unchecked(data_len);
        if payload_len < min_t {
            return Err(Error::BelowMinimum {
                param: Param::PayloadLength,
                value: payload_len.into(),
                min: min_t.into(),
                constraint: "data length",
            });
        }

        let kt = formulas::total_symbols(data_len, payload_len);
        let block = kt.div_ceil(u32::from(self.max_source_blocks()));
        if block > self.max_source_symbols_per_block() {
            return Err(Error::AboveMaximum {
                param: Param::TotalSymbols,
                value: kt.into(),
                max: u64::from(self.max_source_symbols_per_block())
                    * u64::from(self.max_source_blocks()),
                constraint: "maximum number of source blocks",
            });
        }

        let min_ws = self.min_decoding_block_size_given_unchecked(data_len, payload_len);
        if decoding_block_size < min_ws {
            return Err(Error::BelowMinimum {
                param: Param::DecodingBlockSize,
                value: decoding_block_size,
                min: min_ws,
                constraint: "data length and payload length",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn are_valid_deriver_parameters(
        &self,
        data_len: u64,
        payload_len: u16,
        decoding_block_size: u64,
    ) -> bool {
        match self.check_deriver_parameters(data_len, payload_len, decoding_block_size) {
            Ok(()) => true,
            Err(e) => {
                trace!("Rejected derivation inputs: {}", e);
                false
            }
        }
    }

    // === Precondition checks ===

    fn check_data_length(&self, data_len: u64) -> Result<()> {
        if self.is_data_length_out_of_bounds(data_len) {
            return Err(Error::out_of_bounds(
                Param::DataLength,
                data_len,
                self.min_data_length(),
                self.max_data_length(),
            ));
        }
        Ok(())
    }

    fn check_symbol_size(&self, symbol_size: u16) -> Result<()> {
        if self.is_symbol_size_out_of_bounds(symbol_size) {
            return Err(Error::out_of_bounds(
                Param::SymbolSize,
                symbol_size,
                self.min_symbol_size(),
                self.max_symbol_size(),
            ));
        }
        Ok(())
    }

    pub(crate) fn check_source_blocks(&self, num_src_blocks: u16) -> Result<()> {
        if self.is_source_blocks_out_of_bounds(num_src_blocks) {
            return Err(Error::out_of_bounds(
                Param::SourceBlocks,
                num_src_blocks,
                self.min_source_blocks(),
                self.max_source_blocks(),
            ));
        }
        Ok(())
    }

    fn check_interleaver_length(&self, interleaver_len: u16) -> Result<()> {
        if self.is_interleaver_length_out_of_bounds(interleaver_len) {
            return Err(Error::out_of_bounds(
                Param::InterleaverLength,
                interleaver_len,
                self.min_interleaver_length(),
                self.max_interleaver_length(),
            ));
        }
        Ok(())
    }

    fn check_payload_length(&self, payload_len: u16) -> Result<()> {
        if self.is_payload_length_out_of_bounds(payload_len) {
            return Err(Error::out_of_bounds(
                Param::PayloadLength,
                payload_len,
                self.min_payload_length(),
                self.max_payload_length(),
            ));
        }
        Ok(())
    }

    fn check_total_symbols(&self, data_len: u64, symbol_size: u16) -> Result<()> {
        if self.is_total_symbols_out_of_bounds(data_len, symbol_size) {
            let kt = if symbol_size == 0 {
                u64::MAX
            } else {
                formulas::possible_total_symbols(data_len, symbol_size)
            };
            return Err(Error::out_of_bounds(
                Param::TotalSymbols,
                kt,
                1u64,
                self.max_total_symbols(),
            ));
        }
        Ok(())
    }

    fn check_total_symbol_count(&self, total_symbols: u32) -> Result<()> {
        if total_symbols == 0 || total_symbols > self.max_total_symbols() {
            return Err(Error::out_of_bounds(
                Param::TotalSymbols,
                total_symbols,
                1u32,
                self.max_total_symbols(),
            ));
        }
        Ok(())
    }

    fn check_decoding_block_size(&self, decoding_block_size: u64) -> Result<()> {
        let min = self.min_decoding_block_size();
        if decoding_block_size < min {
            return Err(Error::out_of_bounds(
                Param::DecodingBlockSize,
                decoding_block_size,
                min,
                u64::MAX,
            ));
        }
        Ok(())
    }
}
