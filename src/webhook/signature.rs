//! HMAC-SHA256 request authentication for inbound webhooks.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the lowercase hex HMAC of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-signature";

const SIGNATURE_HEX_LEN: usize = 64;

/// Lowercase hex HMAC-SHA256 of `body` keyed with `secret`.
pub fn sign(secret: &str, body: &[u8]) -> Option<String> {
    keyed_mac(secret, body).map(|mac| hex::encode(mac.finalize().into_bytes()))
}

/// Checks `presented` against the HMAC of the exact bytes received.
///
/// Never errors: a missing header, an empty secret, a malformed value and a
/// mismatch all return `false`. The digest comparison is constant-time.
pub fn verify(secret: &str, raw_body: &[u8], presented: Option<&str>) -> bool {
    if secret.is_empty() {
        return false;
    }
    let presented = match presented.map(str::trim) {
        Some(value) if is_lower_hex_digest(value) => value,
        _ => return false,
    };
    let Ok(expected) = hex::decode(presented) else {
        return false;
    };
    match keyed_mac(secret, raw_body) {
        Some(mac) => mac.verify_slice(&expected).is_ok(),
        None => false,
    }
}

fn keyed_mac(secret: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(mac)
}

// Shape check only; it looks at the presented value, never at the secret.
fn is_lower_hex_digest(value: &str) -> bool {
    value.len() == SIGNATURE_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
