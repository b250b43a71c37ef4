//! Telegram Login Widget verification, ported faithfully from
//! `original_source/app/web/auth.py`: exclude `hash`, sort the remaining
//! `key=value` pairs, join with `\n`, HMAC-SHA256 keyed by the raw
//! `SHA256(bot_token)` digest, compare hex digests, and reject stale
//! `auth_date`.

use std::collections::BTreeMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

const MAX_AUTH_AGE_SECS: i64 = 24 * 3600;

/// Verifies a login-widget payload against `bot_token`. `fields` must
/// include `hash` and `auth_date`; every other entry is treated as part of
/// the check string.
pub fn verify_login_payload(fields: &BTreeMap<String, String>, bot_token: &str) -> bool {
    let Some(received_hash) = fields.get("hash") else {
        return false;
    };
    let Some(auth_date) = fields.get("auth_date").and_then(|s| s.parse::<i64>().ok()) else {
        return false;
    };
    if Utc::now().timestamp() - auth_date > MAX_AUTH_AGE_SECS {
        return false;
    }

    let check_string = fields
        .iter()
        .filter(|(k, _)| k.as_str() != "hash")
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let secret_key = Sha256::digest(bot_token.as_bytes());
    let mut mac = Hmac::<Sha256>::new_from_slice(&secret_key).expect("HMAC accepts any key length");
    mac.update(check_string.as_bytes());
    let expected_hash = hex::encode(mac.finalize().into_bytes());

    // Constant-time-ish via hex encoding + string compare is standard for
    // this widget's scheme, but compare on byte slices to avoid any chance
    // of short-circuit timing on the hex representation.
    expected_hash.as_bytes() == received_hash.to_lowercase().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(fields: &BTreeMap<String, String>, bot_token: &str) -> String {
        let check_string = fields.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("\n");
        let secret_key = Sha256::digest(bot_token.as_bytes());
        let mut mac = Hmac::<Sha256>::new_from_slice(&secret_key).unwrap();
        mac.update(check_string.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_with_fresh_auth_date_passes() {
        let bot_token = "test-token";
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), "555".to_string());
        fields.insert("auth_date".to_string(), Utc::now().timestamp().to_string());
        let hash = sign(&fields, bot_token);
        fields.insert("hash".to_string(), hash);

        assert!(verify_login_payload(&fields, bot_token));
    }

    #[test]
    fn stale_auth_date_rejected() {
        let bot_token = "test-token";
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), "555".to_string());
        fields.insert("auth_date".to_string(), (Utc::now().timestamp() - 90_000).to_string());
        let hash = sign(&fields, bot_token);
        fields.insert("hash".to_string(), hash);

        assert!(!verify_login_payload(&fields, bot_token));
    }

    #[test]
    fn tampered_field_rejected() {
        let bot_token = "test-token";
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), "555".to_string());
        fields.insert("auth_date".to_string(), Utc::now().timestamp().to_string());
        let hash = sign(&fields, bot_token);
        fields.insert("hash".to_string(), hash);
        fields.insert("id".to_string(), "556".to_string());

        assert!(!verify_login_payload(&fields, bot_token));
    }
}
