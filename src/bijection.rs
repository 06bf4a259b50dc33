//! Bijection between binary attribute vectors and integer codes.
//!
//! The convention is fixed once for the whole crate: most-significant bit
//! first, so `encode(&[1, 0]) == 2`. Encoding a length-K*T vector equals
//! re-assembling T independent length-K encodings of its contiguous chunks.

use ndarray::ArrayView1;

use crate::error::{Error, Result};

/// Maximum codeword length; codes are held in a `u64`.
pub const MAX_LEN: usize = 63;

/// Encode an ordered sequence of bits into an integer in `[0, 2^len)`.
pub fn encode(bits: &[u8]) -> Result<u64> {
    if bits.len() > MAX_LEN {
        return Err(Error::Contract(format!(
            "bit vector of length {} exceeds the {MAX_LEN}-bit limit",
            bits.len()
        )));
    }
    let mut code = 0u64;
    for &b in bits {
        if b > 1 {
            return Err(Error::Contract(format!("bit value {b} is not 0 or 1")));
        }
        code = (code << 1) | u64::from(b);
    }
    Ok(code)
}

/// Decode an integer code back into its `len` bits, inverting [`encode`].
pub fn decode(code: u64, len: usize) -> Result<Vec<u8>> {
    if len > MAX_LEN {
        return Err(Error::Contract(format!(
            "codeword length {len} exceeds the {MAX_LEN}-bit limit"
        )));
    }
    if code >= (1u64 << len) {
        return Err(Error::Contract(format!(
            "code {code} is out of range for {len} bits"
        )));
    }
    Ok((0..len).map(|i| ((code >> (len - 1 - i)) & 1) as u8).collect())
}

/// Class index of a binary attribute profile, same MSB-first convention.
pub fn class_index(profile: ArrayView1<f64>) -> usize {
    profile
        .iter()
        .fold(0usize, |acc, &a| (acc << 1) | usize::from(a > 0.5))
}

/// Convert a trajectory code stored as `f64` by the sampler into a `u64`,
/// checking it is a non-negative integer below `2^len`.
pub fn code_from_f64(x: f64, len: usize) -> Result<u64> {
    if !x.is_finite() || x < 0.0 || x.fract() != 0.0 {
        return Err(Error::Contract(format!(
            "trajectory code {x} is not a non-negative integer"
        )));
    }
    let code = x as u64;
    if len > MAX_LEN || code >= (1u64 << len) {
        return Err(Error::Contract(format!(
            "trajectory code {code} is out of range for {len} bits"
        )));
    }
    Ok(code)
}
