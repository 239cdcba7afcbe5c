//! FEC Object Transmission Information layout (RFC 6330 section 3.3)
//!
//! ```text
//! Common FEC OTI (64 bits)
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      Transfer Length (F)                      |
//! +               +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |               |    Reserved   |        Symbol Size (T)        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!
//! Scheme-Specific FEC OTI (32 bits)
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |       Z       |              N                |       Al      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Z is an 8-bit field carrying values 1 to 256; 256 is encoded as 0.

/// Octets in the common FEC OTI
pub const COMMON_OTI_LEN: usize = 8;
/// Octets in the scheme-specific FEC OTI
pub const SCHEME_SPECIFIC_OTI_LEN: usize = 4;
/// Octets in the full FEC OTI
pub const OTI_LEN: usize = COMMON_OTI_LEN + SCHEME_SPECIFIC_OTI_LEN;

/// Largest value of the 40-bit transfer length field
pub const MAX_DATA_LENGTH_FIELD: u64 = (1 << 40) - 1;
/// Largest number of source blocks the 8-bit Z field can carry
pub const MAX_SOURCE_BLOCKS_FIELD: u16 = 256;
/// Largest value of the 24-bit encoding symbol ID field
pub const MAX_ENCODING_SYMBOL_ID_FIELD: u32 = (1 << 24) - 1;

const DATA_LENGTH_SHIFT: u32 = 24;
const RESERVED_SHIFT: u32 = 16;
const RESERVED_MASK: u64 = 0xFF << RESERVED_SHIFT;
const SYMBOL_SIZE_MASK: u64 = 0xFFFF;

const SOURCE_BLOCKS_SHIFT: u32 = 24;
const INTERLEAVER_SHIFT: u32 = 8;
const INTERLEAVER_MASK: u32 = 0xFFFF;
const ALIGNMENT_MASK: u32 = 0xFF;

/// Pack F and T into the common FEC OTI
///
/// F must fit 40 bits.
#[must_use]
pub const fn pack_common(data_len: u64, symbol_size: u16) -> u64 {
    ((data_len & MAX_DATA_LENGTH_FIELD) << DATA_LENGTH_SHIFT) | symbol_size as u64
}

/// Pack Z, N and Al into the scheme-specific FEC OTI
///
/// Z must lie within 1 to 256.
#[must_use]
pub const fn pack_scheme_specific(num_src_blocks: u16, interleaver_len: u16, al: u8) -> u32 {
    let z = (num_src_blocks & 0xFF) as u32;
    (z << SOURCE_BLOCKS_SHIFT) | ((interleaver_len as u32) << INTERLEAVER_SHIFT) | al as u32
}

/// Transfer length F
#[must_use]
pub const fn unpack_data_length(common: u64) -> u64 {
    common >> DATA_LENGTH_SHIFT
}

/// Reserved octet of the common FEC OTI, zero in a well-formed field
#[must_use]
pub const fn unpack_reserved(common: u64) -> u8 {
    ((common & RESERVED_MASK) >> RESERVED_SHIFT) as u8
}

/// Symbol size T
#[must_use]
pub const fn unpack_symbol_size(common: u64) -> u16 {
    (common & SYMBOL_SIZE_MASK) as u16
}

/// Number of source blocks Z
#[must_use]
pub const fn unpack_source_blocks(scheme_specific: u32) -> u16 {
    match scheme_specific >> SOURCE_BLOCKS_SHIFT {
        0 => MAX_SOURCE_BLOCKS_FIELD,
        z => z as u16,
    }
}

/// Interleaver length N
#[must_use]
pub const fn unpack_interleaver_length(scheme_specific: u32) -> u16 {
    ((scheme_specific >> INTERLEAVER_SHIFT) & INTERLEAVER_MASK) as u16
}

/// Symbol alignment Al
#[must_use]
pub const fn unpack_symbol_alignment(scheme_specific: u32) -> u8 {
    (scheme_specific & ALIGNMENT_MASK) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_layout() {
        let common = pack_common(0x12_3456_789A, 0xBCDE);
        assert_eq!(common, 0x1234_5678_9A00_BCDE);
        assert_eq!(unpack_data_length(common), 0x12_3456_789A);
        assert_eq!(unpack_reserved(common), 0);
        assert_eq!(unpack_symbol_size(common), 0xBCDE);

        let max = pack_common(MAX_DATA_LENGTH_FIELD, u16::MAX);
        assert_eq!(max, 0xFFFF_FFFF_FF00_FFFF);
        assert_eq!(unpack_reserved(0x0000_0000_00AB_0000), 0xAB);
    }

    #[test]
    fn test_scheme_specific_layout() {
        let ss = pack_scheme_specific(0x12, 0x3456, 0x04);
        assert_eq!(ss, 0x1234_5604);
        assert_eq!(unpack_source_blocks(ss), 0x12);
        assert_eq!(unpack_interleaver_length(ss), 0x3456);
        assert_eq!(unpack_symbol_alignment(ss), 4);
    }

    #[test]
    fn test_256_source_blocks_encoded_as_zero() {
        let ss = pack_scheme_specific(256, 1, 4);
        assert_eq!(ss >> 24, 0);
        assert_eq!(unpack_source_blocks(ss), 256);
        assert_eq!(unpack_source_blocks(pack_scheme_specific(255, 1, 4)), 255);
        assert_eq!(unpack_source_blocks(pack_scheme_specific(1, 1, 4)), 1);
    }
}
