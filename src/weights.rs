//! Primary-weight arithmetic.
//!
//! Primaries are up to four bytes. The second byte of a compressible lead byte
//! ranges over 04..FE since 02, 03 and FF are reserved for the merge separator
//! and the primary compression terminators. Otherwise it ranges over 02..FF.
//! Third bytes always range over 02..FF.

use crate::ce_ty::{Ce, UNASSIGNED_IMPLICIT_BYTE};

/// Primary for an unassigned code point, or for `[first unassigned]` when `c == -1`.
///
/// The weights preserve code point order and fit under the single lead byte 0xFE.
pub fn unassigned_primary(c: i32) -> u32 {
    let mut c = (c + 1) as u32;
    // fourth byte: 18 values, every 14th byte value
    let mut primary = 2 + (c % 18) * 14;
    c /= 18;
    // third byte: 254 values
    primary |= (2 + (c % 254)) << 8;
    c /= 254;
    // second byte: 251 values 04..FE
    primary |= (4 + (c % 251)) << 16;
    primary | (UNASSIGNED_IMPLICIT_BYTE << 24)
}

/// CE with [`unassigned_primary`] and common secondary and tertiary weights.
#[inline]
pub fn unassigned_ce(c: i32) -> Ce {
    Ce::from_primary(unassigned_primary(c))
}

/// Add `offset` to the second byte of a two-byte primary, carrying into the lead byte.
pub fn inc_two_byte_primary_by_offset(base: u32, compressible: bool, offset: u32) -> u32 {
    let mut offset = offset;
    let primary;
    if compressible {
        offset += ((base >> 16) & 0xff) - 4;
        primary = ((offset % 251) + 4) << 16;
        offset /= 251;
    } else {
        offset += ((base >> 16) & 0xff) - 2;
        primary = ((offset % 254) + 2) << 16;
        offset /= 254;
    }
    primary | (base & 0xff00_0000).wrapping_add(offset << 24)
}

/// Add `offset` to the third byte of a three-byte primary, carrying into the second and lead bytes.
pub fn inc_three_byte_primary_by_offset(base: u32, compressible: bool, offset: u32) -> u32 {
    let mut offset = offset + ((base >> 8) & 0xff) - 2;
    let mut primary = ((offset % 254) + 2) << 8;
    offset /= 254;
    if compressible {
        offset += ((base >> 16) & 0xff) - 4;
        primary |= ((offset % 251) + 4) << 16;
        offset /= 251;
    } else {
        offset += ((base >> 16) & 0xff) - 2;
        primary |= ((offset % 254) + 2) << 16;
        offset /= 254;
    }
    primary | (base & 0xff00_0000).wrapping_add(offset << 24)
}

/// Subtract `step` from the second byte of a two-byte primary, borrowing from the lead byte.
pub fn dec_two_byte_primary_by_one_step(base: u32, compressible: bool, step: u32) -> u32 {
    let mut base = base;
    let mut byte2 = ((base >> 16) & 0xff) as i32 - step as i32;
    if compressible {
        if byte2 < 4 {
            byte2 += 251;
            base = base.wrapping_sub(0x0100_0000);
        }
    } else if byte2 < 2 {
        byte2 += 254;
        base = base.wrapping_sub(0x0100_0000);
    }
    (base & 0xff00_0000) | ((byte2 as u32) << 16)
}

/// Subtract `step` from the third byte of a three-byte primary, borrowing as needed.
pub fn dec_three_byte_primary_by_one_step(base: u32, compressible: bool, step: u32) -> u32 {
    let mut base = base;
    let mut byte3 = ((base >> 8) & 0xff) as i32 - step as i32;
    if byte3 >= 2 {
        return (base & 0xffff_0000) | ((byte3 as u32) << 8);
    }
    byte3 += 254;
    let mut byte2 = ((base >> 16) & 0xff) as i32 - 1;
    if compressible {
        if byte2 < 4 {
            byte2 = 0xfe;
            base = base.wrapping_sub(0x0100_0000);
        }
    } else if byte2 < 2 {
        byte2 = 0xff;
        base = base.wrapping_sub(0x0100_0000);
    }
    (base & 0xff00_0000) | ((byte2 as u32) << 16) | ((byte3 as u32) << 8)
}

/// Primary of `c` inside an offset range.
///
/// The data CE holds the range's first three-byte primary in its upper half and
/// `bbbbbbbb bbbbbbbb bbbbbbbb csssssss` below: base code point, compressible
/// flag and step.
pub fn three_byte_primary_for_offset_data(c: u32, data_ce: Ce) -> u32 {
    let p = data_ce.primary();
    let lower32 = data_ce.lower32();
    let offset = (c - (lower32 >> 8)) * (lower32 & 0x7f);
    inc_three_byte_primary_by_offset(p, lower32 & 0x80 != 0, offset)
}

/// The data CE stored for an offset range starting at `base_cp`.
pub fn offset_data_ce(primary: u32, base_cp: u32, compressible: bool, step: u8) -> Ce {
    let flag = if compressible { 0x80 } else { 0 };
    Ce(((primary as u64) << 32) | ((base_cp as u64) << 8) | flag | (step as u64 & 0x7f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_unassigned() {
        assert_eq!(0xfe04_0202, unassigned_primary(-1));
        assert_eq!(0xfe04_0210, unassigned_primary(0));
    }

    #[test]
    fn test_unassigned_primary_order() {
        let mut prev = unassigned_primary(-1);
        for c in (0..0x11_0000).step_by(97).chain([0x10_ffff]) {
            let p = unassigned_primary(c);
            assert!(prev < p, "{:x} {:x} at U+{:04X}", prev, p, c);
            assert_eq!(0xfe, p >> 24);
            assert!(((p >> 16) & 0xff) >= 4 && ((p >> 16) & 0xff) <= 0xfe);
            assert!(((p >> 8) & 0xff) >= 2);
            prev = p;
        }
    }

    #[test]
    fn test_inc_two_byte_carries() {
        assert_eq!(0x0a05_0000, inc_two_byte_primary_by_offset(0x0a04_0000, true, 1));
        assert_eq!(0x0b04_0000, inc_two_byte_primary_by_offset(0x0afe_0000, true, 1));
        assert_eq!(0x0b02_0000, inc_two_byte_primary_by_offset(0x0aff_0000, false, 1));
    }

    #[test]
    fn test_inc_three_byte_carries() {
        assert_eq!(0x1002_0300, inc_three_byte_primary_by_offset(0x1002_0200, false, 1));
        assert_eq!(0x1003_0200, inc_three_byte_primary_by_offset(0x1002_ff00, false, 1));
        assert_eq!(0x1104_0200, inc_three_byte_primary_by_offset(0x10fe_ff00, true, 1));
    }

    #[test]
    fn test_dec_inverts_inc() {
        for &(base, compressible) in &[(0x0a10_0000u32, true), (0x0a04_0000, true), (0x0a02_0000, false)] {
            let next = inc_two_byte_primary_by_offset(base, compressible, 3);
            assert_eq!(base, dec_two_byte_primary_by_one_step(next, compressible, 3));
        }
        for &(base, compressible) in &[(0x1002_0200u32, false), (0x10fe_ff00, true), (0x10ff_ff00, false)] {
            let next = inc_three_byte_primary_by_offset(base, compressible, 1);
            assert_eq!(base, dec_three_byte_primary_by_one_step(next, compressible, 1));
        }
    }

    #[test]
    fn test_offset_data() {
        let data = offset_data_ce(0x1002_0200, 0x4e00, false, 1);
        assert_eq!(0x1002_0200, three_byte_primary_for_offset_data(0x4e00, data));
        assert_eq!(0x1002_0300, three_byte_primary_for_offset_data(0x4e01, data));
        assert_eq!(0x1003_0200, three_byte_primary_for_offset_data(0x4e00 + 254, data));
    }
}
