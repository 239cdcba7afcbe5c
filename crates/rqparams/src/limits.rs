//! Scheme limits
//!
//! Every absolute bound used by the checker lives in one immutable
//! configuration value. [`Limits::RFC_6330`] holds the values of the
//! RaptorQ FEC scheme; alternative sets can be used for testing or for
//! deployments that want tighter bounds.

use crate::error::{Error, Result};
use crate::oti;
use serde::{Deserialize, Serialize};

/// Absolute bounds of the FEC scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Minimum source data length F (octets)
    pub min_data_length: u64,
    /// Maximum source data length F (octets, at most 40 bits)
    pub max_data_length: u64,
    /// Minimum symbol size T (octets)
    pub min_symbol_size: u16,
    /// Maximum symbol size T (octets)
    pub max_symbol_size: u16,
    /// Minimum number of source blocks Z
    pub min_source_blocks: u16,
    /// Maximum number of source blocks Z (at most 256)
    pub max_source_blocks: u16,
    /// Minimum interleaver length N
    pub min_interleaver_length: u16,
    /// Maximum interleaver length N
    pub max_interleaver_length: u16,
    /// Minimum number of source symbols per block K
    pub min_source_symbols: u32,
    /// Maximum number of source symbols per block K
    pub max_source_symbols: u32,
    /// Smallest extended (systematic) block size K'
    pub min_extended_source_symbols: u32,
    /// Maximum total number of source symbols Kt
    pub max_total_symbols: u32,
    /// Symbol alignment Al (octets)
    pub symbol_alignment: u8,
    /// Lower bound on the sub-symbol size, in units of Al (SS)
    pub sub_symbol_factor: u16,
    /// Minimum source block number
    pub min_source_block_number: u8,
    /// Maximum source block number
    pub max_source_block_number: u8,
    /// Minimum encoding symbol identifier
    pub min_encoding_symbol_id: u32,
    /// Maximum encoding symbol identifier (at most 24 bits)
    pub max_encoding_symbol_id: u32,
}

impl Limits {
    /// RaptorQ limits (RFC 6330)
    pub const RFC_6330: Self = Self {
        min_data_length: 1,
        max_data_length: 946_270_874_880,
        min_symbol_size: 4,
        max_symbol_size: 65_532,
        min_source_blocks: 1,
        max_source_blocks: 256,
        min_interleaver_length: 1,
        max_interleaver_length: 16_383,
        min_source_symbols: 1,
        max_source_symbols: 56_403,
        min_extended_source_symbols: 10,
        max_total_symbols: 56_403 * 256,
        symbol_alignment: 4,
        sub_symbol_factor: 1,
        min_source_block_number: 0,
        max_source_block_number: 255,
        min_encoding_symbol_id: 0,
        max_encoding_symbol_id: (1 << 24) - 1,
    };

    /// Check the limits for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_data_length == 0 || self.min_data_length > self.max_data_length {
            return Err(Error::configuration(format!(
                "data length bounds [{}, {}] are empty or include zero",
                self.min_data_length, self.max_data_length
            )));
        }
        if self.max_data_length > oti::MAX_DATA_LENGTH_FIELD {
            return Err(Error::configuration(format!(
                "maximum data length {} does not fit the 40-bit OTI field",
                self.max_data_length
            )));
        }
        if self.symbol_alignment == 0 {
            return Err(Error::configuration("symbol alignment must be > 0"));
        }
        if self.sub_symbol_factor == 0 {
            return Err(Error::configuration("sub-symbol factor must be > 0"));
        }
        if self.min_symbol_size < u16::from(self.symbol_alignment)
            || self.min_symbol_size > self.max_symbol_size
        {
            return Err(Error::configuration(format!(
                "symbol size bounds [{}, {}] must be non-empty and start at the alignment {}",
                self.min_symbol_size, self.max_symbol_size, self.symbol_alignment
            )));
        }
        if self.min_source_blocks == 0
            || self.min_source_blocks > self.max_source_blocks
            || self.max_source_blocks > oti::MAX_SOURCE_BLOCKS_FIELD
        {
            return Err(Error::configuration(format!(
                "source block bounds [{}, {}] must lie within [1, {}]",
                self.min_source_blocks,
                self.max_source_blocks,
                oti::MAX_SOURCE_BLOCKS_FIELD
            )));
        }
        if self.min_interleaver_length == 0
            || self.min_interleaver_length > self.max_interleaver_length
        {
            return Err(Error::configuration(format!(
                "interleaver length bounds [{}, {}] are empty or include zero",
                self.min_interleaver_length, self.max_interleaver_length
            )));
        }
        if self.min_source_symbols == 0 || self.min_source_symbols > self.max_source_symbols {
            return Err(Error::configuration(format!(
                "source symbol bounds [{}, {}] are empty or include zero",
                self.min_source_symbols, self.max_source_symbols
            )));
        }
        if self.min_extended_source_symbols == 0
            || self.min_extended_source_symbols > self.max_source_symbols
        {
            return Err(Error::configuration(format!(
                "smallest extended block size {} must lie within [1, {}]",
                self.min_extended_source_symbols, self.max_source_symbols
            )));
        }
        if self.max_total_symbols < self.max_source_symbols {
            return Err(Error::configuration(format!(
                "maximum total symbols {} is smaller than the per-block maximum {}",
                self.max_total_symbols, self.max_source_symbols
            )));
        }
        let block_capacity =
            u64::from(self.max_source_symbols) * u64::from(self.max_source_blocks);
        if u64::from(self.max_total_symbols) > block_capacity {
            return Err(Error::configuration(format!(
                "maximum total symbols {} exceeds {} blocks of {} symbols",
                self.max_total_symbols, self.max_source_blocks, self.max_source_symbols
            )));
        }
        if self.min_source_block_number > self.max_source_block_number {
            return Err(Error::configuration("source block number bounds are empty"));
        }
        if self.min_encoding_symbol_id > self.max_encoding_symbol_id
            || self.max_encoding_symbol_id > oti::MAX_ENCODING_SYMBOL_ID_FIELD
        {
            return Err(Error::configuration(format!(
                "encoding symbol ID bounds [{}, {}] must lie within the 24-bit field",
                self.min_encoding_symbol_id, self.max_encoding_symbol_id
            )));
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::RFC_6330
    }
}
