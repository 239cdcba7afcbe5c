//! RQParams - RaptorQ FEC parameter derivation and validation
//!
//! This crate computes, validates and packs the FEC Object Transmission
//! Information (OTI) of the RaptorQ scheme (RFC 6330):
//! - F: source data length in octets
//! - T: symbol size in octets
//! - Z: number of source blocks
//! - N: interleaver length (sub-blocks per source block)
//! - Al: symbol alignment
//!
//! # Components
//!
//! - **checker**: absolute and conditional bounds of every parameter
//! - **parameters**: the validated value object and its derivation from a
//!   payload length and decoder memory budget
//! - **oti**: the packed 12-octet wire layout
//!
//! # Example
//!
//! ```
//! use rqparams::{FecParameters, ParameterChecker};
//!
//! let checker = ParameterChecker::default();
//! let params = FecParameters::derive(10 * 1024 * 1024, 1400, 1 << 20).unwrap();
//! assert!(checker.are_valid_parameters(
//!     params.data_length(),
//!     params.symbol_size(),
//!     params.num_source_blocks(),
//!     params.interleaver_length(),
//! ));
//! ```

pub mod checker;
pub mod error;
pub mod formulas;
pub mod limits;
pub mod oti;
pub mod parameters;
pub mod payload;
pub mod systematic;

pub use checker::ParameterChecker;
pub use error::{Error, Param, Result};
pub use limits::Limits;
pub use parameters::{FecParameters, Partition};
pub use payload::PayloadId;
pub use systematic::{Rfc6330Indices, SystematicIndices};

/// Prelude for common imports
pub mod prelude {
    pub use super::{Error, FecParameters, Limits, ParameterChecker, PayloadId, Result};
}
