//! Bearer token payload decoding and expiry checks.
//!
//! Signatures are not verified here; the backend is the authority on token
//! validity. The client only reads the payload to decide whether a token is
//! worth keeping and whom it belongs to.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use session_sdk::TokenClaims;

/// Standard alphabet, padding optional.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode the claims carried in the token's payload segment.
///
/// Returns `None` when the segment is missing, is not valid base64url, or
/// does not hold a JSON object. That is a recoverable condition, not an
/// error.
#[must_use]
pub fn decode_payload(token: &str) -> Option<TokenClaims> {
    let segment = token.split('.').nth(1)?;
    let standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = PAYLOAD_ENGINE.decode(standard.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether `claims` are expired at `now_ms` (milliseconds since the epoch).
///
/// Valid only if `exp`, scaled to milliseconds, is strictly greater than
/// `now_ms`. Missing `exp` means expired.
#[must_use]
pub fn is_expired_at(claims: &TokenClaims, now_ms: i128) -> bool {
    let Some(exp) = claims.exp.as_ref() else {
        return true;
    };
    if let Some(secs) = exp.as_i64() {
        return i128::from(secs) * 1000 <= now_ms;
    }
    if let Some(secs) = exp.as_u64() {
        return i128::from(secs) * 1000 <= now_ms;
    }
    #[allow(clippy::cast_precision_loss)]
    let now = now_ms as f64;
    exp.as_f64().is_none_or(|secs| secs * 1000.0 <= now)
}

/// Whether `token` is expired at `now_ms`. Undecodable tokens are expired.
#[must_use]
pub fn is_token_expired(token: &str, now_ms: i128) -> bool {
    decode_payload(token).is_none_or(|claims| is_expired_at(&claims, now_ms))
}
