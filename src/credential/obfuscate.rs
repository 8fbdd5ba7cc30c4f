//! Reversible obfuscation for the stored API key.
//!
//! This only keeps the key from being readable at a glance when someone
//! opens the storage file. It is **not** encryption: anyone holding the
//! stored value can recover the key with [`deobfuscate`].

use base64::Engine;

/// Marker prepended to the secret before encoding.
const SECRET_PREFIX: &str = "studio_enc_";

/// Encodes a secret for storage: marker prefix, base64, then reversed.
pub fn obfuscate(secret: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{SECRET_PREFIX}{secret}"));
    encoded.chars().rev().collect()
}

/// Recovers a secret produced by [`obfuscate`].
///
/// Returns an empty string for anything that was not produced by
/// [`obfuscate`], so corrupt or foreign storage content reads as "no key".
pub fn deobfuscate(encoded: &str) -> String {
    let reversed: String = encoded.trim().chars().rev().collect();
    let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(reversed) else {
        return String::new();
    };
    let Ok(decoded) = String::from_utf8(bytes) else {
        return String::new();
    };
    decoded
        .strip_prefix(SECRET_PREFIX)
        .map(str::to_string)
        .unwrap_or_default()
}
