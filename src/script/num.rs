//! Script numbers
//!
//! Stack elements double as integers: little-endian, minimal, sign-magnitude.
//! The top bit of the last byte is the sign, zero is the empty string, and an
//! extra `0x00`/`0x80` byte is appended when the magnitude already uses that bit.

use crate::error::{Error, Result};

/// Longest element accepted as a numeric operand
pub const MAX_NUM_LEN: usize = 8;

pub fn encode_num(num: i64) -> Vec<u8> {
    if num == 0 {
        return Vec::new();
    }
    let negative = num < 0;
    let mut magnitude = num.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while magnitude > 0 {
        out.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }

    // `out` is non-empty because num != 0
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

/// Decode a stack element as a number
///
/// # Errors
/// [`Error::NumberOverflow`] for elements longer than [`MAX_NUM_LEN`] bytes.
pub fn decode_num(element: &[u8]) -> Result<i64> {
    let Some((&last, _)) = element.split_last() else {
        return Ok(0);
    };
    if element.len() > MAX_NUM_LEN {
        return Err(Error::NumberOverflow(MAX_NUM_LEN));
    }

    let negative = last & 0x80 != 0;
    let mut magnitude: u64 = 0;
    for (i, &byte) in element.iter().enumerate() {
        let byte = if i == element.len() - 1 { byte & 0x7f } else { byte };
        magnitude |= (byte as u64) << (8 * i);
    }

    // At most 63 magnitude bits remain once the sign bit is cleared
    let value = magnitude as i64;
    Ok(if negative { -value } else { value })
}

/// Truthiness of a stack element: false for any all-zero string, including
/// the "negative zero" whose final byte is `0x80`
pub fn cast_to_bool(element: &[u8]) -> bool {
    match element.split_last() {
        None => false,
        Some((&last, rest)) => {
            rest.iter().any(|&b| b != 0) || (last != 0 && last != 0x80)
        }
    }
}
