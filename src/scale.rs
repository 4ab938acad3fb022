//! Input scaling shared by the time and space samplers.
//!
//! The law is plain repetition: scale factor `k` turns `word` into `k`
//! concatenated copies of it, so a word of `n` chars becomes `k * n` chars.

use crate::error::{MarkovianError, Result};

pub fn generate(word: &str, k: usize) -> Result<String> {
    if k == 0 {
        return Err(MarkovianError::InvalidScale(k));
    }
    Ok(word.repeat(k))
}

/// Checks that `scales` are positive and strictly ascending.
pub fn validate(scales: &[usize]) -> Result<()> {
    if let Some(&k) = scales.iter().find(|&&k| k == 0) {
        return Err(MarkovianError::InvalidScale(k));
    }
    if let Some(pair) = scales.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(MarkovianError::InvalidScales(format!(
            "scale factors must strictly increase, got {} before {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}
