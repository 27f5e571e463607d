use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Header GitHub uses for the HMAC digest of the delivery body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

pub const REASON_SIGNATURE_MISSING: &str = "Signature not found.";
pub const REASON_SIGNATURE_INVALID: &str = "Invalid signature.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Verdict on a webhook delivery's authenticity.
pub enum SignatureOutcome {
    /// Digest matched the configured secret over the raw body bytes.
    Authentic,
    /// No secret is configured; processing proceeds but the caller must log
    /// the insecure path loudly. Local-development escape hatch only.
    Unverified,
    /// Missing, malformed, or mismatching signature. Reject with 401.
    Forged { reason: &'static str },
}

/// Verifies `sha256=<hex>` over the raw, unparsed request body.
///
/// The body must be the exact bytes received on the wire; re-serializing a
/// parsed payload changes whitespace and field order and breaks the digest.
/// Comparison runs through `Mac::verify_slice`, which is constant-time.
pub fn verify_webhook_signature(
    raw_body: &[u8],
    signature_header: Option<&str>,
    secret: Option<&str>,
) -> SignatureOutcome {
    let Some(secret) = secret.map(str::trim).filter(|value| !value.is_empty()) else {
        return SignatureOutcome::Unverified;
    };
    let Some(header) = signature_header
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        return SignatureOutcome::Forged {
            reason: REASON_SIGNATURE_MISSING,
        };
    };
    let Some(digest_hex) = header.strip_prefix("sha256=") else {
        return SignatureOutcome::Forged {
            reason: REASON_SIGNATURE_INVALID,
        };
    };
    let Some(signature_bytes) = decode_hex(digest_hex) else {
        return SignatureOutcome::Forged {
            reason: REASON_SIGNATURE_INVALID,
        };
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return SignatureOutcome::Forged {
            reason: REASON_SIGNATURE_INVALID,
        };
    };
    mac.update(raw_body);
    if mac.verify_slice(&signature_bytes).is_ok() {
        SignatureOutcome::Authentic
    } else {
        SignatureOutcome::Forged {
            reason: REASON_SIGNATURE_INVALID,
        }
    }
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() % 2 != 0 {
        return None;
    }

    let raw = trimmed.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len() / 2);
    let mut index = 0_usize;
    while index < raw.len() {
        let pair = std::str::from_utf8(&raw[index..index + 2]).ok()?;
        bytes.push(u8::from_str_radix(pair, 16).ok()?);
        index += 2;
    }
    Some(bytes)
}
