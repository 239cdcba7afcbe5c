//! FEC payload identifier (RFC 6330 section 3.2)
//!
//! Every encoding symbol is addressed by the source block it belongs to
//! (SBN, 8 bits) and its encoding symbol ID within that block (ESI,
//! 24 bits), packed together into one 32-bit field.

use crate::checker::ParameterChecker;
use crate::error::{Error, Param, Result};
use crate::oti::MAX_ENCODING_SYMBOL_ID_FIELD;
use crate::systematic::SystematicIndices;
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Octets in an encoded FEC payload ID
pub const PAYLOAD_ID_LEN: usize = 4;

const SBN_SHIFT: u32 = 24;

/// Source block number and encoding symbol ID of one symbol
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct PayloadId {
    sbn: u8,
    esi: u32,
}

impl PayloadId {
    /// Create a payload ID, checking the ESI against the 24-bit field
    pub fn new(sbn: u8, esi: u32) -> Result<Self> {
        if esi > MAX_ENCODING_SYMBOL_ID_FIELD {
            return Err(Error::out_of_bounds(
                Param::EncodingSymbolId,
                esi,
                0u32,
                MAX_ENCODING_SYMBOL_ID_FIELD,
            ));
        }
        Ok(Self { sbn, esi })
    }

    /// Create a payload ID checked against a checker's SBN and ESI bounds
    pub fn new_in<S: SystematicIndices>(
        checker: &ParameterChecker<S>,
        sbn: u8,
        esi: u32,
    ) -> Result<Self> {
        if checker.is_source_block_number_out_of_bounds(sbn) {
            return Err(Error::out_of_bounds(
                Param::SourceBlockNumber,
                sbn,
                checker.min_source_block_number(),
                checker.max_source_block_number(),
            ));
        }
        if checker.is_encoding_symbol_id_out_of_bounds(esi) {
            return Err(Error::out_of_bounds(
                Param::EncodingSymbolId,
                esi,
                checker.min_encoding_symbol_id(),
                checker.max_encoding_symbol_id(),
            ));
        }
        Self::new(sbn, esi)
    }

    /// Source block number
    #[must_use]
    pub const fn source_block_number(&self) -> u8 {
        self.sbn
    }

    /// Encoding symbol ID
    #[must_use]
    pub const fn encoding_symbol_id(&self) -> u32 {
        self.esi
    }

    /// Pack into the 32-bit wire field
    #[must_use]
    pub const fn to_u32(&self) -> u32 {
        ((self.sbn as u32) << SBN_SHIFT) | self.esi
    }

    /// Unpack from the 32-bit wire field
    #[must_use]
    pub const fn from_u32(field: u32) -> Self {
        Self {
            sbn: (field >> SBN_SHIFT) as u8,
            esi: field & MAX_ENCODING_SYMBOL_ID_FIELD,
        }
    }

    /// Write the payload ID in network byte order
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32(self.to_u32());
    }

    /// Read a payload ID in network byte order
    pub fn decode(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < PAYLOAD_ID_LEN {
            return Err(Error::invalid_oti(format!(
                "FEC payload ID needs {PAYLOAD_ID_LEN} octets, got {}",
                buf.remaining()
            )));
        }
        Ok(Self::from_u32(buf.get_u32()))
    }
}

impl From<u32> for PayloadId {
    fn from(field: u32) -> Self {
        Self::from_u32(field)
    }
}

impl From<PayloadId> for u32 {
    fn from(id: PayloadId) -> Self {
        id.to_u32()
    }
}

impl fmt::Debug for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadId(sbn={}, esi={})", self.sbn, self.esi)
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sbn, self.esi)
    }
}
