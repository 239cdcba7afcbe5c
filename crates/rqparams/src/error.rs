//! Error types for RQParams
//!
//! Every failure in this crate is an invalid-parameter precondition
//! violation. The variants only differ in how the violated bound is
//! described.

use std::fmt;
use thiserror::Error;

/// Common result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Parameter named by an [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    /// F, the source data length in octets
    DataLength,
    /// T, the symbol size in octets
    SymbolSize,
    /// Z, the number of source blocks
    SourceBlocks,
    /// N, the interleaver length (sub-blocks per source block)
    InterleaverLength,
    /// Al, the symbol alignment
    SymbolAlignment,
    /// P, the maximum payload length used for derivation
    PayloadLength,
    /// WS, the maximum decoding block size (working memory) in octets
    DecodingBlockSize,
    /// Kt, the total number of source symbols
    TotalSymbols,
    /// K, the number of source symbols in one block
    SourceSymbolsPerBlock,
    /// SBN, the source block number
    SourceBlockNumber,
    /// ESI, the encoding symbol identifier
    EncodingSymbolId,
}

impl Param {
    /// Get the parameter name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DataLength => "data length",
            Self::SymbolSize => "symbol size",
            Self::SourceBlocks => "number of source blocks",
            Self::InterleaverLength => "interleaver length",
            Self::SymbolAlignment => "symbol alignment",
            Self::PayloadLength => "payload length",
            Self::DecodingBlockSize => "decoding block size",
            Self::TotalSymbols => "total number of symbols",
            Self::SourceSymbolsPerBlock => "number of source symbols per block",
            Self::SourceBlockNumber => "source block number",
            Self::EncodingSymbolId => "encoding symbol ID",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Invalid-parameter error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{param} {value} is out of bounds [{min}, {max}]")]
    OutOfBounds {
        param: Param,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{param} {value} is below the minimum {min} allowed by the {constraint}")]
    BelowMinimum {
        param: Param,
        value: u64,
        min: u64,
        constraint: &'static str,
    },

    #[error("{param} {value} is above the maximum {max} allowed by the {constraint}")]
    AboveMaximum {
        param: Param,
        value: u64,
        max: u64,
        constraint: &'static str,
    },

    #[error("invalid OTI: {0}")]
    InvalidOti(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create an absolute bounds error
    pub fn out_of_bounds(
        param: Param,
        value: impl Into<u64>,
        min: impl Into<u64>,
        max: impl Into<u64>,
    ) -> Self {
        Self::OutOfBounds {
            param,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        }
    }

    /// Create a malformed OTI error
    pub fn invalid_oti(msg: impl Into<String>) -> Self {
        Self::InvalidOti(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Get the parameter this error is about, if it names one
    #[must_use]
    pub const fn param(&self) -> Option<Param> {
        match self {
            Self::OutOfBounds { param, .. }
            | Self::BelowMinimum { param, .. }
            | Self::AboveMaximum { param, .. } => Some(*param),
            Self::InvalidOti(_) | Self::Configuration(_) => None,
        }
    }

    /// Check if this is an absolute bounds violation
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
