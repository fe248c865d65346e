//! Collation elements for runs of decimal digits under numeric collation.
//!
//! Primary second bytes:
//! * 2..75: values 0..73 in two-byte primaries,
//! * 76..115: values 74..10233 in three-byte primaries,
//! * 116..131: values 10234..1042489 in four-byte primaries,
//! * 132..255: larger values as 4..127 digit pairs, one pair per byte.

use crate::ce_ty::Ce;

/// Longest digit run encoded as one segment.
pub const MAX_SEGMENT_LENGTH: usize = 254;

/// Append CEs for a run of digit values 0..=9 in text order.
///
/// Leading zeros are dropped, keeping the last digit, and long runs are split
/// into segments of at most [`MAX_SEGMENT_LENGTH`] digits.
pub fn append_numeric_ces(numeric_primary: u32, digits: &[u8], out: &mut impl Extend<Ce>) {
    let mut pos = 0;
    while pos < digits.len() {
        while pos < digits.len() - 1 && digits[pos] == 0 {
            pos += 1;
        }
        let segment_length = (digits.len() - pos).min(MAX_SEGMENT_LENGTH);
        append_numeric_segment_ces(numeric_primary, &digits[pos..pos + segment_length], out);
        pos += segment_length;
    }
}

fn append_numeric_segment_ces(numeric_primary: u32, digits: &[u8], out: &mut impl Extend<Ce>) {
    debug_assert!(!digits.is_empty() && digits.len() <= MAX_SEGMENT_LENGTH);
    debug_assert!(digits.len() == 1 || digits[0] != 0);
    if digits.len() <= 7 {
        let mut value = digits.iter().fold(0u32, |v, &d| v * 10 + d as u32);
        let mut first_byte = 2;
        let mut num_bytes = 74;
        if value < num_bytes {
            let primary = numeric_primary | ((first_byte + value) << 16);
            out.extend([Ce::from_primary(primary)]);
            return;
        }
        value -= num_bytes;
        first_byte += num_bytes;
        num_bytes = 40;
        if value < num_bytes * 254 {
            let primary =
                numeric_primary | ((first_byte + value / 254) << 16) | ((2 + value % 254) << 8);
            out.extend([Ce::from_primary(primary)]);
            return;
        }
        value -= num_bytes * 254;
        first_byte += num_bytes;
        num_bytes = 16;
        if value < num_bytes * 254 * 254 {
            let mut primary = numeric_primary | (2 + value % 254);
            value /= 254;
            primary |= (2 + value % 254) << 8;
            value /= 254;
            primary |= (first_byte + value % 254) << 16;
            out.extend([Ce::from_primary(primary)]);
            return;
        }
    }

    // exponent byte: 4 pairs -> 132, ..., 127 pairs -> 255
    let num_pairs = (digits.len() as u32 + 1) / 2;
    let mut primary = numeric_primary | ((132 - 4 + num_pairs) << 16);
    let mut length = digits.len();
    while digits[length - 1] == 0 && digits[length - 2] == 0 {
        length -= 2;
    }
    let (mut pair, mut pos) = if length & 1 == 1 {
        (digits[0] as u32, 1)
    } else {
        (digits[0] as u32 * 10 + digits[1] as u32, 2)
    };
    pair = 11 + 2 * pair;
    let mut shift = 8;
    while pos < length {
        if shift == 0 {
            // four bytes are full, continue in a new CE
            primary |= pair;
            out.extend([Ce::from_primary(primary)]);
            primary = numeric_primary;
            shift = 16;
        } else {
            primary |= pair << shift;
            shift -= 8;
        }
        pair = 11 + 2 * (digits[pos] as u32 * 10 + digits[pos + 1] as u32);
        pos += 2;
    }
    primary |= (pair - 1) << shift;
    out.extend([Ce::from_primary(primary)]);
}
