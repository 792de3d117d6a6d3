//! Conversion between the console's native word order and a linear byte
//! stream. The N64 stores save RAM as 32-bit words, so every group of four
//! bytes comes out reversed when dumped.

use crate::error::{CoreError, Result};

pub const WORD_LEN: usize = 4;

/// Returns a copy of `bytes` with every 4-byte word reversed. Applying it
/// twice yields the input.
pub fn swap_words(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = bytes.to_vec();
    swap_words_in_place(&mut out)?;
    Ok(out)
}

pub fn swap_words_in_place(bytes: &mut [u8]) -> Result<()> {
    if bytes.len() % WORD_LEN != 0 {
        return Err(CoreError::malformed(format!(
            "cannot word-swap {} bytes: length is not a multiple of {WORD_LEN}",
            bytes.len()
        )));
    }

    for word in bytes.chunks_exact_mut(WORD_LEN) {
        word.reverse();
    }
    Ok(())
}
