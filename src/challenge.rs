use getrandom::getrandom;

use crate::error::Result;

pub const CHALLENGE_LENGTH: usize = 128;

/// 64 symbols, so `byte % 64` maps random bytes without bias.
pub const CHALLENGE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Returns a fresh 128 character challenge token drawn from the OS random source.
pub fn get_random_challenge() -> Result<String> {
    let mut bytes = [0u8; CHALLENGE_LENGTH];
    getrandom(&mut bytes)?;
    Ok(bytes
        .iter()
        .map(|value| {
            let index = (*value as usize) % CHALLENGE_ALPHABET.len();
            CHALLENGE_ALPHABET[index] as char
        })
        .collect())
}
