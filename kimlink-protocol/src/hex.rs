//! Binary to hex-string conversion
//!
//! Uplink payloads are passed to the module as uppercase hex text
//! (`AT+TX=0A1B...`). Two output characters per input byte.

use heapless::String;

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Hex encoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HexError {
    /// Output cannot hold two characters per input byte
    BufferTooSmall,
}

/// Write `input` as uppercase hex into `out`
///
/// Returns the number of characters written (`2 * input.len()`).
pub fn encode_upper(input: &[u8], out: &mut [u8]) -> Result<usize, HexError> {
    let needed = input.len() * 2;
    if out.len() < needed {
        return Err(HexError::BufferTooSmall);
    }

    for (byte, pair) in input.iter().zip(out.chunks_exact_mut(2)) {
        pair[0] = DIGITS[(byte >> 4) as usize];
        pair[1] = DIGITS[(byte & 0x0F) as usize];
    }

    Ok(needed)
}

/// Encode `input` as an uppercase hex string of capacity `N`
pub fn to_hex_string<const N: usize>(input: &[u8]) -> Result<String<N>, HexError> {
    let mut s = String::new();
    for byte in input {
        s.push(DIGITS[(byte >> 4) as usize] as char)
            .map_err(|_| HexError::BufferTooSmall)?;
        s.push(DIGITS[(byte & 0x0F) as usize] as char)
            .map_err(|_| HexError::BufferTooSmall)?;
    }
    Ok(s)
}
