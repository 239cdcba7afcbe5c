//! FEC parameters value object
//!
//! [`FecParameters`] is the validated (F, T, Z, N, Al) tuple stored in its
//! packed OTI form. It is built either from explicit values, derived from a
//! payload length and decoder memory budget, or parsed from OTI received
//! from a peer.
//!
//! # Example
//!
//! ```
//! use rqparams::FecParameters;
//!
//! let params = FecParameters::derive(1_000_000, 1024, 64 * 1024 * 1024).unwrap();
//! assert_eq!(params.symbol_size(), 1024);
//! assert_eq!(params.total_symbols(), 977);
//!
//! let bytes = params.to_bytes();
//! let mut buf = &bytes[..];
//! assert_eq!(FecParameters::decode(&mut buf).unwrap(), params);
//! ```

use crate::checker::ParameterChecker;
use crate::error::{Error, Result};
use crate::formulas;
use crate::oti;
use crate::payload::PayloadId;
use crate::systematic::SystematicIndices;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Validated RaptorQ FEC parameters, held as packed OTI fields
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawOti", into = "RawOti")]
pub struct FecParameters {
    common_fec_oti: u64,
    scheme_specific_fec_oti: u32,
}

#[derive(Serialize, Deserialize)]
struct RawOti {
    common_fec_oti: u64,
    scheme_specific_fec_oti: u32,
}

impl TryFrom<RawOti> for FecParameters {
    type Error = Error;

    fn try_from(raw: RawOti) -> Result<Self> {
        Self::from_oti(raw.common_fec_oti, raw.scheme_specific_fec_oti)
    }
}

impl From<FecParameters> for RawOti {
    fn from(params: FecParameters) -> Self {
        Self {
            common_fec_oti: params.common_fec_oti,
            scheme_specific_fec_oti: params.scheme_specific_fec_oti,
        }
    }
}

/// Split of `I` items into `J` near-equal parts (RFC 6330 section 4.4.1.2)
///
/// The first `large_count` parts hold `large_size` items, the remaining
/// `small_count` parts hold `small_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    pub large_size: u32,
    pub small_size: u32,
    pub large_count: u32,
    pub small_count: u32,
}

impl Partition {
    /// Partition `total` items into `parts` parts
    ///
    /// `parts` must be non-zero.
    #[must_use]
    pub const fn new(total: u32, parts: u32) -> Self {
        let small_size = total / parts;
        let large_count = total - small_size * parts;
        Self {
            large_size: total.div_ceil(parts),
            small_size,
            large_count,
            small_count: parts - large_count,
        }
    }

    /// Number of parts
    #[must_use]
    pub const fn parts(&self) -> u32 {
        self.large_count + self.small_count
    }

    /// Size of the part at `index`, or `None` past the last part
    #[must_use]
    pub const fn size_of(&self, index: u32) -> Option<u32> {
        if index < self.large_count {
            Some(self.large_size)
        } else if index < self.parts() {
            Some(self.small_size)
        } else {
            None
        }
    }
}

impl FecParameters {
    /// Create parameters with the minimum interleaver length
    pub fn new(data_len: u64, symbol_size: u16, num_src_blocks: u16) -> Result<Self> {
        Self::new_in(&ParameterChecker::RFC_6330, data_len, symbol_size, num_src_blocks)
    }

    /// Create parameters with the minimum interleaver length of `checker`
    pub fn new_in<S: SystematicIndices>(
        checker: &ParameterChecker<S>,
        data_len: u64,
        symbol_size: u16,
        num_src_blocks: u16,
    ) -> Result<Self> {
        Self::with_interleaver_in(
            checker,
            data_len,
            symbol_size,
            num_src_blocks,
            checker.min_interleaver_length(),
        )
    }

    /// Create parameters from explicit (F, T, Z, N)
    pub fn with_interleaver(
        data_len: u64,
        symbol_size: u16,
        num_src_blocks: u16,
        interleaver_len: u16,
    ) -> Result<Self> {
        Self::with_interleaver_in(
            &ParameterChecker::RFC_6330,
            data_len,
            symbol_size,
            num_src_blocks,
            interleaver_len,
        )
    }

    pub fn with_interleaver_in<S: SystematicIndices>(
        checker: &ParameterChecker<S>,
        data_len: u64,
        symbol_size: u16,
        num_src_blocks: u16,
        interleaver_len: u16,
    ) -> Result<Self> {
        checker.check_parameters(data_len, symbol_size, num_src_blocks, interleaver_len)?;
        let params = Self::new_unchecked(
            data_len,
            symbol_size,
            num_src_blocks,
            interleaver_len,
            checker.symbol_alignment(),
        );
        trace!("Created {}", params);
        Ok(params)
    }

    /// Derive parameters from a data length, payload length and decoder memory budget
    ///
    /// The symbol size is the payload length. The number of source blocks is
    /// the fewest whose blocks fit `decoding_block_size` at the highest
    /// interleaving, and the interleaver length is then the smallest that
    /// keeps the largest block within the budget.
    pub fn derive(data_len: u64, payload_len: u16, decoding_block_size: u64) -> Result<Self> {
        Self::derive_in(
            &ParameterChecker::RFC_6330,
            data_len,
            payload_len,
            decoding_block_size,
        )
    }

    pub fn derive_in<S: SystematicIndices>(
        checker: &ParameterChecker<S>,
        data_len: u64,
        payload_len: u16,
        decoding_block_size: u64,
    ) -> Result<Self> {
        checker.check_deriver_parameters(data_len, payload_len, decoding_block_size)?;

        let symbol_size = payload_len;
        let kt = formulas::total_symbols(data_len, symbol_size);
        let n_top = checker.top_interleaver_length(symbol_size);
        let num_src_blocks =
            derive_source_blocks(checker, kt, symbol_size, n_top, decoding_block_size);
        let interleaver_len = derive_interleaver_length(
            checker,
            kt,
            num_src_blocks,
            symbol_size,
            n_top,
            decoding_block_size,
        );

        debug_assert!(
            checker.are_valid_parameters(data_len, symbol_size, num_src_blocks, interleaver_len),
            "derived invalid parameters F={data_len} T={symbol_size} Z={num_src_blocks} N={interleaver_len}"
        );

        let params = Self::new_unchecked(
            data_len,
            symbol_size,
            num_src_blocks,
            interleaver_len,
            checker.symbol_alignment(),
        );
        debug!(
            "Derived {} from P={}, WS={}",
            params, payload_len, decoding_block_size
        );
        Ok(params)
    }

    /// Pack parameters without any validation
    ///
    /// F is truncated to 40 bits and Z to 8 bits (256 maps to 0).
    #[must_use]
    pub const fn new_unchecked(
        data_len: u64,
        symbol_size: u16,
        num_src_blocks: u16,
        interleaver_len: u16,
        symbol_alignment: u8,
    ) -> Self {
        Self {
            common_fec_oti: oti::pack_common(data_len, symbol_size),
            scheme_specific_fec_oti: oti::pack_scheme_specific(
                num_src_blocks,
                interleaver_len,
                symbol_alignment,
            ),
        }
    }

    /// Parse OTI fields received from a peer
    pub fn from_oti(common_fec_oti: u64, scheme_specific_fec_oti: u32) -> Result<Self> {
        Self::from_oti_in(&ParameterChecker::RFC_6330, common_fec_oti, scheme_specific_fec_oti)
    }

    pub fn from_oti_in<S: SystematicIndices>(
        checker: &ParameterChecker<S>,
        common_fec_oti: u64,
        scheme_specific_fec_oti: u32,
    ) -> Result<Self> {
        let reserved = oti::unpack_reserved(common_fec_oti);
        if reserved != 0 {
            return Err(Error::invalid_oti(format!(
                "reserved field is {reserved:#04x}, expected 0"
            )));
        }
        let al = oti::unpack_symbol_alignment(scheme_specific_fec_oti);
        if al != checker.symbol_alignment() {
            return Err(Error::invalid_oti(format!(
                "symbol alignment {al} does not match the scheme alignment {}",
                checker.symbol_alignment()
            )));
        }

        let params = Self {
            common_fec_oti,
            scheme_specific_fec_oti,
        };
        checker.check_parameters(
            params.data_length(),
            params.symbol_size(),
            params.num_source_blocks(),
            params.interleaver_length(),
        )?;
        Ok(params)
    }

    /// Read the 12-octet OTI in network byte order
    pub fn decode(buf: &mut impl Buf) -> Result<Self> {
        Self::decode_in(&ParameterChecker::RFC_6330, buf)
    }

    pub fn decode_in<S: SystematicIndices>(
        checker: &ParameterChecker<S>,
        buf: &mut impl Buf,
    ) -> Result<Self> {
        if buf.remaining() < oti::OTI_LEN {
            return Err(Error::invalid_oti(format!(
                "OTI needs {} octets, got {}",
                oti::OTI_LEN,
                buf.remaining()
            )));
        }
        let common = buf.get_u64();
        let scheme_specific = buf.get_u32();
        Self::from_oti_in(checker, common, scheme_specific)
    }

    /// Write the 12-octet OTI in network byte order
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u64(self.common_fec_oti);
        buf.put_u32(self.scheme_specific_fec_oti);
    }

    /// Encode into a fresh buffer
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(oti::OTI_LEN);
        self.encode(&mut buf);
        buf.freeze()
    }

    // === Accessors ===

    #[must_use]
    pub const fn common_fec_oti(&self) -> u64 {
        self.common_fec_oti
    }

    #[must_use]
    pub const fn scheme_specific_fec_oti(&self) -> u32 {
        self.scheme_specific_fec_oti
    }

    /// Source data length F in octets
    #[must_use]
    pub const fn data_length(&self) -> u64 {
        oti::unpack_data_length(self.common_fec_oti)
    }

    /// Symbol size T in octets
    #[must_use]
    pub const fn symbol_size(&self) -> u16 {
        oti::unpack_symbol_size(self.common_fec_oti)
    }

    /// Number of source blocks Z
    #[must_use]
    pub const fn num_source_blocks(&self) -> u16 {
        oti::unpack_source_blocks(self.scheme_specific_fec_oti)
    }

    /// Interleaver length N (sub-blocks per source block)
    #[must_use]
    pub const fn interleaver_length(&self) -> u16 {
        oti::unpack_interleaver_length(self.scheme_specific_fec_oti)
    }

    /// Symbol alignment Al in octets
    #[must_use]
    pub const fn symbol_alignment(&self) -> u8 {
        oti::unpack_symbol_alignment(self.scheme_specific_fec_oti)
    }

    /// Total number of source symbols Kt
    ///
    /// Recomputed from F and T; 0 for a zero symbol size.
    #[must_use]
    pub fn total_symbols(&self) -> u32 {
        match self.symbol_size() {
            0 => 0,
            t => u32::try_from(formulas::possible_total_symbols(self.data_length(), t))
                .unwrap_or(u32::MAX),
        }
    }

    // === Partitioning ===

    /// Split of the Kt source symbols over the Z source blocks
    #[must_use]
    pub fn source_block_partition(&self) -> Partition {
        Partition::new(self.total_symbols(), u32::from(self.num_source_blocks()))
    }

    /// Split of a symbol into N sub-symbols, in units of Al octets
    ///
    /// `None` if T is not a multiple of Al.
    #[must_use]
    pub fn sub_block_partition(&self) -> Option<Partition> {
        let al = u16::from(self.symbol_alignment());
        let n = self.interleaver_length();
        if al == 0 || n == 0 || self.symbol_size() % al != 0 {
            return None;
        }
        Some(Partition::new(
            u32::from(self.symbol_size() / al),
            u32::from(n),
        ))
    }

    /// Number of source symbols in block `sbn`
    #[must_use]
    pub fn source_block_symbols(&self, sbn: u8) -> Option<u32> {
        self.source_block_partition().size_of(u32::from(sbn))
    }

    /// Check whether a payload ID addresses a symbol of this object
    #[must_use]
    ///
    /// Fails if Z is outside the scheme's bounds.
    pub fn is_valid_payload_id(&self, id: &PayloadId) -> Result<bool> {
        self.is_valid_payload_id_in(&ParameterChecker::RFC_6330, id)
    }

    pub fn is_valid_payload_id_in<S: SystematicIndices>(
        &self,
        checker: &ParameterChecker<S>,
        id: &PayloadId,
    ) -> Result<bool> {
        checker.is_valid_payload_id(
            id.source_block_number(),
            id.encoding_symbol_id(),
            self.num_source_blocks(),
        )
    }
}

fn derive_source_blocks<S: SystematicIndices>(
    checker: &ParameterChecker<S>,
    total_symbols: u32,
    symbol_size: u16,
    n_top: u16,
    decoding_block_size: u64,
) -> u16 {
    let kl = checker.source_symbols_for_memory(decoding_block_size, symbol_size, n_top);
    let z = total_symbols.div_ceil(kl.max(1));
    u16::try_from(z).unwrap_or(u16::MAX)
}

fn derive_interleaver_length<S: SystematicIndices>(
    checker: &ParameterChecker<S>,
    total_symbols: u32,
    num_src_blocks: u16,
    symbol_size: u16,
    n_top: u16,
    decoding_block_size: u64,
) -> u16 {
    let largest_block = total_symbols.div_ceil(u32::from(num_src_blocks));
    (checker.min_interleaver_length()..=n_top)
        .find(|&n| {
            largest_block <= checker.source_symbols_for_memory(decoding_block_size, symbol_size, n)
        })
        .unwrap_or(n_top)
}

impl fmt::Debug for FecParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FecParameters")
            .field("data_length", &self.data_length())
            .field("symbol_size", &self.symbol_size())
            .field("num_source_blocks", &self.num_source_blocks())
            .field("interleaver_length", &self.interleaver_length())
            .field("symbol_alignment", &self.symbol_alignment())
            .finish()
    }
}

impl fmt::Display for FecParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FEC parameters (F={}, T={}, Z={}, N={}, Al={})",
            self.data_length(),
            self.symbol_size(),
            self.num_source_blocks(),
            self.interleaver_length(),
            self.symbol_alignment()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Param;
    use crate::limits::Limits;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const F_MAX: u64 = 946_270_874_880;
    const KT_MAX: u64 = 14_439_168;

    #[test]
    fn test_new() {
        let params = FecParameters::new(1_000_000, 1024, 1).unwrap();
        assert_eq!(params.data_length(), 1_000_000);
        assert_eq!(params.symbol_size(), 1024);
        assert_eq!(params.num_source_blocks(), 1);
        assert_eq!(params.interleaver_length(), 1);
        assert_eq!(params.symbol_alignment(), 4);
        assert_eq!(params.total_symbols(), 977);
    }

    #[test]
    fn test_new_rejects_too_few_blocks() {
        let c = ParameterChecker::default();
        let (f, t) = (56_404 * 8, 8);
        let min_z = c.min_source_blocks_for(f, t).unwrap();
        assert_eq!(min_z, 2);
        let err = FecParameters::new(f, t, min_z - 1).unwrap_err();
        assert_eq!(err.param(), Some(Param::SourceBlocks));
        assert!(FecParameters::new(f, t, min_z).is_ok());
    }

    #[test]
    fn test_with_interleaver() {
        let params = FecParameters::with_interleaver(1_000_000, 1024, 256, 256).unwrap();
        assert_eq!(params.num_source_blocks(), 256);
        assert_eq!(params.interleaver_length(), 256);
        assert!(FecParameters::with_interleaver(1_000_000, 1024, 1, 257).is_err());
        assert!(FecParameters::with_interleaver(0, 1024, 1, 1).is_err());
    }

    #[test]
    fn test_source_blocks_256_packs_as_zero() {
        let params = FecParameters::new(1_000_000, 1024, 256).unwrap();
        assert_eq!(params.scheme_specific_fec_oti() >> 24, 0);
        assert_eq!(params.num_source_blocks(), 256);
    }

    #[test]
    fn test_new_unchecked_packs_verbatim() {
        let params = FecParameters::new_unchecked(0, 3, 300, 0, 7);
        assert_eq!(params.data_length(), 0);
        assert_eq!(params.symbol_size(), 3);
        assert_eq!(params.num_source_blocks(), 300 & 0xFF);
        assert_eq!(params.symbol_alignment(), 7);
        assert_eq!(params.sub_block_partition(), None);
        assert_eq!(FecParameters::new_unchecked(10, 0, 1, 1, 4).total_symbols(), 0);
    }

    #[test]
    fn test_derive_uses_payload_as_symbol_size() {
        let params = FecParameters::derive(1_000_000, 1024, 64 * 1024 * 1024).unwrap();
        assert_eq!(params.symbol_size(), 1024);
        assert_eq!(params.num_source_blocks(), 1);
        assert_eq!(params.interleaver_length(), 1);
    }

    #[test]
    fn test_derive_tight_memory() {
        // WS = 40 only fits 10 symbols of 4-octet sub-symbols
        let params = FecParameters::derive(1_000_000, 1024, 40).unwrap();
        assert_eq!(params.symbol_size(), 1024);
        assert_eq!(params.num_source_blocks(), 98);
        assert_eq!(params.interleaver_length(), 256);

        assert!(FecParameters::derive(1_000_000, 1024, 39).is_err());
        assert!(FecParameters::derive(1_000_000, 2, 1 << 20).is_err());
    }

    #[test]
    fn test_derive_unaligned_payload() {
        // T = 1023 gives n_top = 255 and 8-octet sub-symbols, so WS = 80 holds 10 symbols
        let params = FecParameters::derive(1_000_000, 1023, 80).unwrap();
        assert_eq!(params.symbol_size(), 1023);
        assert_eq!(params.total_symbols(), 978);
        assert_eq!(params.num_source_blocks(), 98);
        // smallest n with 4 * ceil(1023 / 4n) <= 8
        assert_eq!(params.interleaver_length(), 128);
        assert_eq!(params.sub_block_partition(), None);

        let err = FecParameters::derive(1_000_000, 1023, 79).unwrap_err();
        assert!(matches!(
            err,
            Error::BelowMinimum { param: Param::DecodingBlockSize, min: 80, .. }
        ));
    }

    #[test]
    fn test_derive_smallest_object() {
        let params = FecParameters::derive(1, 4, 40).unwrap();
        assert_eq!(params.data_length(), 1);
        assert_eq!(params.symbol_size(), 4);
        assert_eq!(params.num_source_blocks(), 1);
        assert_eq!(params.interleaver_length(), 1);
    }

    #[test]
    fn test_derive_random() {
        let c = ParameterChecker::default();
        let mut rng = StdRng::seed_from_u64(6330);
        let mut derived = 0;
        for _ in 0..2_000 {
            let f = rng.gen_range(1..=F_MAX);
            let p = rng.gen_range(4..=65_532u16);
            let ws = rng.gen_range(40..=1u64 << 32);
            if !c.are_valid_deriver_parameters(f, p, ws) {
                assert!(FecParameters::derive(f, p, ws).is_err());
                continue;
            }
            let params = FecParameters::derive(f, p, ws).unwrap();
            assert_eq!(params.symbol_size(), p);
            assert_eq!(params.data_length(), f);
            assert!(c.are_valid_parameters(
                params.data_length(),
                params.symbol_size(),
                params.num_source_blocks(),
                params.interleaver_length(),
            ));

            // the largest block fits the memory budget at the chosen N
            let largest = params.source_block_partition().large_size;
            let kl = c.source_symbols_for_memory(ws, p, params.interleaver_length());
            assert!(largest <= kl);
            derived += 1;
        }
        assert!(derived > 0);
    }

    #[test]
    fn test_derive_with_minimal_payload() {
        let c = ParameterChecker::default();
        let f = KT_MAX * 100 + 1;
        let p = c.min_symbol_size_given(f).unwrap();
        assert_eq!(p, 101);
        let params = FecParameters::derive(f, p, u64::MAX).unwrap();
        assert_eq!(params.symbol_size(), p);
        // Kt = 14_296_206 needs ceil(Kt / 56_403) blocks
        assert_eq!(params.num_source_blocks(), 254);
    }

    #[test]
    fn test_validated_instances_revalidate() {
        let c = ParameterChecker::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            let t = rng.gen_range(4..=65_532u16);
            let f = rng.gen_range(1..=(KT_MAX * u64::from(t)).min(F_MAX));
            let kt = formulas::total_symbols(f, t);
            let z = rng.gen_range(
                c.min_source_blocks_given(kt).unwrap()..=c.max_source_blocks_given(kt).unwrap(),
            );
            let n = rng.gen_range(1..=c.max_interleaver_length_given(t).unwrap());
            let params = FecParameters::with_interleaver(f, t, z, n).unwrap();
            assert!(c.are_valid_parameters(
                params.data_length(),
                params.symbol_size(),
                params.num_source_blocks(),
                params.interleaver_length(),
            ));
            assert_eq!(
                FecParameters::from_oti(params.common_fec_oti(), params.scheme_specific_fec_oti())
                    .unwrap(),
                params
            );
        }
    }

    #[test]
    fn test_from_oti_rejects_malformed_fields() {
        let params = FecParameters::new(1_000_000, 1024, 1).unwrap();
        let common = params.common_fec_oti();
        let ss = params.scheme_specific_fec_oti();

        let err = FecParameters::from_oti(common | 0x0001_0000, ss).unwrap_err();
        assert!(matches!(err, Error::InvalidOti(_)));

        let err = FecParameters::from_oti(common, (ss & !0xFF) | 8).unwrap_err();
        assert!(matches!(err, Error::InvalidOti(_)));

        // N = 0
        let err = FecParameters::from_oti(common, ss & 0xFF00_00FF).unwrap_err();
        assert_eq!(err.param(), Some(Param::InterleaverLength));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let params = FecParameters::with_interleaver(123_456_789, 1400, 7, 5).unwrap();
        let bytes = params.to_bytes();
        assert_eq!(bytes.len(), oti::OTI_LEN);

        let mut buf = bytes.clone();
        assert_eq!(FecParameters::decode(&mut buf).unwrap(), params);
        assert_eq!(buf.remaining(), 0);

        let mut short = bytes.slice(..11);
        assert!(matches!(FecParameters::decode(&mut short), Err(Error::InvalidOti(_))));
    }

    #[test]
    fn test_matches_raptorq_oti() {
        let cases = [
            (1_000_000u64, 1024u16, 1u16, 1u16),
            (123_456_789, 1400, 7, 5),
            (900_000_000_000, 65_528, 255, 16_382),
            (40, 4, 10, 1),
        ];
        for (f, t, z, n) in cases {
            let params = FecParameters::with_interleaver(f, t, z, n).unwrap();
            let z = u8::try_from(z).unwrap();
            let theirs = raptorq::ObjectTransmissionInformation::new(f, t, z, n, 4);
            assert_eq!(&params.to_bytes()[..], &theirs.serialize()[..]);
        }
    }

    #[test]
    fn test_partition() {
        let p = Partition::new(977, 98);
        assert_eq!(p.large_size, 10);
        assert_eq!(p.small_size, 9);
        assert_eq!(p.large_count, 95);
        assert_eq!(p.small_count, 3);
        assert_eq!(p.parts(), 98);
        assert_eq!(
            p.large_size * p.large_count + p.small_size * p.small_count,
            977
        );

        let even = Partition::new(100, 10);
        assert_eq!(even.large_size, 10);
        assert_eq!(even.small_size, 10);
        assert_eq!(even.large_count, 0);
        assert_eq!(even.small_count, 10);
        assert_eq!(even.size_of(9), Some(10));
        assert_eq!(even.size_of(10), None);
    }

    #[test]
    fn test_source_block_partition() {
        let params = FecParameters::derive(1_000_000, 1024, 40).unwrap();
        let p = params.source_block_partition();
        assert_eq!(p.parts(), 98);
        assert_eq!(params.source_block_symbols(0), Some(10));
        assert_eq!(params.source_block_symbols(94), Some(10));
        assert_eq!(params.source_block_symbols(95), Some(9));
        assert_eq!(params.source_block_symbols(97), Some(9));
        assert_eq!(params.source_block_symbols(98), None);

        let total: u32 = (0..=255u8).filter_map(|sbn| params.source_block_symbols(sbn)).sum();
        assert_eq!(total, params.total_symbols());
    }

    #[test]
    fn test_sub_block_partition() {
        let params = FecParameters::with_interleaver(1_000_000, 1024, 1, 3).unwrap();
        let p = params.sub_block_partition().unwrap();
        // 256 alignment units over 3 sub-blocks
        assert_eq!((p.large_size, p.small_size), (86, 85));
        assert_eq!((p.large_count, p.small_count), (1, 2));

        let unaligned = FecParameters::new(1_000, 6, 1).unwrap();
        assert_eq!(unaligned.sub_block_partition(), None);
    }

    #[test]
    fn test_is_valid_payload_id() {
        let params = FecParameters::new(1_000_000, 1024, 4).unwrap();
        assert!(params.is_valid_payload_id(&PayloadId::new(0, 0).unwrap()).unwrap());
        assert!(params.is_valid_payload_id(&PayloadId::new(3, (1 << 24) - 1).unwrap()).unwrap());
        assert!(!params.is_valid_payload_id(&PayloadId::new(4, 0).unwrap()).unwrap());
    }

    #[test]
    fn test_is_valid_payload_id_custom_limits() {
        let mut limits = Limits::RFC_6330;
        limits.max_encoding_symbol_id = 1_000;
        let c = ParameterChecker::new(limits).unwrap();
        let params = FecParameters::new_in(&c, 1_000_000, 1024, 4).unwrap();

        let id = PayloadId::new(3, 1_001).unwrap();
        assert!(!params.is_valid_payload_id_in(&c, &id).unwrap());
        assert!(params.is_valid_payload_id(&id).unwrap());
        assert!(params.is_valid_payload_id_in(&c, &PayloadId::new(3, 1_000).unwrap()).unwrap());

        // Z outside the checker's bounds is an error, not an invalid ID
        let mut limits = Limits::RFC_6330;
        limits.max_source_blocks = 2;
        limits.max_total_symbols = 2 * limits.max_source_symbols;
        let c = ParameterChecker::new(limits).unwrap();
        let err = params
            .is_valid_payload_id_in(&c, &PayloadId::new(0, 0).unwrap())
            .unwrap_err();
        assert_eq!(err.param(), Some(Param::SourceBlocks));
    }

    #[test]
    fn test_custom_checker() {
        let mut limits = Limits::RFC_6330;
        limits.max_source_blocks = 8;
        limits.max_total_symbols = 8 * limits.max_source_symbols;
        let c = ParameterChecker::new(limits).unwrap();
        assert!(FecParameters::new_in(&c, 1_000_000, 1024, 8).is_ok());
        assert!(FecParameters::new_in(&c, 1_000_000, 1024, 9).is_err());
        assert!(FecParameters::new(1_000_000, 1024, 9).is_ok());

        let params = FecParameters::derive_in(&c, 1_000_000, 1024, 1 << 20).unwrap();
        assert!(params.num_source_blocks() <= 8);
    }

    #[test]
    fn test_serde() {
        let params = FecParameters::with_interleaver(123_456_789, 1400, 7, 5).unwrap();
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(
            json,
            format!(
                "{{\"common_fec_oti\":{},\"scheme_specific_fec_oti\":{}}}",
                params.common_fec_oti(),
                params.scheme_specific_fec_oti()
            )
        );
        let back: FecParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);

        let bad = "{\"common_fec_oti\":0,\"scheme_specific_fec_oti\":16777476}";
        assert!(serde_json::from_str::<FecParameters>(bad).is_err());
    }

    #[test]
    fn test_display() {
        let params = FecParameters::new(1_000_000, 1024, 1).unwrap();
        assert_eq!(
            params.to_string(),
            "FEC parameters (F=1000000, T=1024, Z=1, N=1, Al=4)"
        );
    }
}
