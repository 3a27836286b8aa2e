use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};

use crate::encoding::utf8encoded;

type HmacSha1 = Hmac<Sha1>;

const HASH_KEY_PREFIX: &str = "hash_";

/// Lowercase hex SHA-1 of the UTF-8 encoding of `value`.
pub fn sha1_hash(value: &str) -> String {
    let bytes = utf8encoded(Some(value)).unwrap_or_default();
    hex::encode(Sha1::digest(&bytes))
}

/// Stable, opaque key name derived from `value`, e.g. for storage keys.
pub fn get_hash_key_name(value: &str) -> String {
    format!("{HASH_KEY_PREFIX}{}", sha1_hash(value))
}

/// Lowercase hex HMAC-SHA1 of `data` keyed by `secret`.
pub fn sha1_hmac(secret: impl AsRef<[u8]>, data: impl AsRef<[u8]>) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_ref()).expect("HMAC can take key of any size");
    mac.update(data.as_ref());
    hex::encode(mac.finalize().into_bytes())
}
