use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::SecondsFormat;
use chrono::Utc;
use hmac::Hmac;
use hmac::Mac;
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::TokenError;
use super::principal::Principal;

type HmacSha256 = Hmac<Sha256>;

const CLAIM_USER: &str = "user";
const CLAIM_NAME: &str = "name";
const CLAIM_EXPIRES: &str = "expires";

#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: Header = Header {
    alg: "HS256",
    typ: "JWT",
};

#[derive(Serialize)]
struct Payload<'a> {
    user: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires: Option<String>,
}

/// Signed token codec.
///
/// Tokens are `base64(header).base64(payload).hex(hmac)` where the HMAC is
/// HMAC-SHA256 over the first two segments joined by a dot. Only the fixed
/// HS256 header is ever produced, and the received header is treated as
/// opaque signed material; there is no algorithm negotiation.
pub struct TokenCodec {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a new token codec.
    ///
    /// # Arguments
    /// * `secret` - Signing secret shared by every instance of the service
    /// * `ttl` - Lifetime of issued tokens; zero issues tokens without expiry
    ///
    /// # Security Notes
    /// - Changing the secret invalidates every previously issued token at once
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            secret: secret.to_vec(),
            ttl,
        }
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Encode a principal into a signed token issued now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn encode(&self, principal: &Principal) -> Result<String, TokenError> {
        self.encode_at(principal, Utc::now())
    }

    /// Encode a principal into a signed token issued at `issued_at`.
    ///
    /// The `expires` claim is written as RFC 3339 in UTC with second
    /// precision, and only when the ttl is non-zero. Sub-second expiry
    /// instants are rounded up, so a token never lives shorter than its ttl.
    /// A negative ttl yields a token that is already expired.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed, or the expiry is out of range
    pub fn encode_at(
        &self,
        principal: &Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires = if self.ttl == Duration::zero() {
            None
        } else {
            let expires = issued_at
                .checked_add_signed(self.ttl)
                .and_then(ceil_to_second)
                .ok_or_else(|| {
                    TokenError::EncodingFailed("expiry instant out of range".to_string())
                })?;
            Some(expires.to_rfc3339_opts(SecondsFormat::Secs, true))
        };

        let header = encode_segment(&HEADER)?;
        let payload = encode_segment(&Payload {
            user: &principal.username,
            name: &principal.name,
            expires,
        })?;

        let signing_input = format!("{}.{}", header, payload);
        let signature = self.sign(&signing_input)?;

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Decode and verify a token against the current time.
    ///
    /// # Errors
    /// * `FormatInvalid` - Wrong segment layout, undecodable payload, or unparseable expiry
    /// * `SignatureInvalid` - Signature does not match the received segments
    /// * `Expired` - The expiry instant is not after now
    pub fn decode(&self, token: &str) -> Result<Principal, TokenError> {
        self.decode_at(token, Utc::now())
    }

    /// Decode and verify a token against `now`.
    ///
    /// Stages run in order and stop at the first failure: segment format,
    /// signature, payload decoding, expiry.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        let &[header, payload, signature] = segments.as_slice() else {
            return Err(TokenError::FormatInvalid(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(TokenError::FormatInvalid("empty segment".to_string()));
        }

        let expected = self.sign(&format!("{}.{}", header, payload))?;
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(TokenError::SignatureInvalid);
        }

        let mut claims = decode_claims(payload)?;

        let expires = match claims.remove(CLAIM_EXPIRES) {
            Some(raw) => {
                let expires = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| {
                        TokenError::FormatInvalid(format!("invalid expires claim: {}", e))
                    })?
                    .with_timezone(&Utc);
                Some(expires)
            }
            None => None,
        };

        if expires.is_some_and(|expires| expires <= now) {
            return Err(TokenError::Expired);
        }

        let username = claims
            .remove(CLAIM_USER)
            .ok_or_else(|| TokenError::FormatInvalid("missing user claim".to_string()))?;
        let name = claims.remove(CLAIM_NAME).unwrap_or_default();

        Ok(Principal {
            username,
            name,
            expires,
        })
    }

    fn sign(&self, content: &str) -> Result<String, TokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| TokenError::EncodingFailed(format!("invalid signing key: {}", e)))?;
        mac.update(content.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

fn ceil_to_second(instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match instant.timestamp_subsec_nanos() {
        0 => Some(instant),
        nanos => instant.checked_add_signed(Duration::nanoseconds(
            1_000_000_000 - i64::from(nanos),
        )),
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    serde_json::to_vec(value)
        .map(|json| BASE64.encode(json))
        .map_err(|e| TokenError::EncodingFailed(e.to_string()))
}

fn decode_claims(segment: &str) -> Result<HashMap<String, String>, TokenError> {
    let json = BASE64
        .decode(segment)
        .map_err(|e| TokenError::FormatInvalid(format!("payload is not base64: {}", e)))?;
    serde_json::from_slice(&json)
        .map_err(|e| TokenError::FormatInvalid(format!("payload is not a flat object: {}", e)))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    fn alice() -> Principal {
        Principal::new("alice", "Alice Liddell")
    }

    fn segments(token: &str) -> Vec<String> {
        token.split('.').map(str::to_string).collect()
    }

    fn replace_char(segment: &str, index: usize) -> String {
        segment
            .char_indices()
            .map(|(i, c)| match (i == index, c) {
                (true, 'A') => 'B',
                (true, _) => 'A',
                (false, c) => c,
            })
            .collect()
    }

    #[test]
    fn test_encode_produces_three_segments() {
        let codec = TokenCodec::new(SECRET, Duration::zero());

        let token = codec.encode(&alice()).expect("Failed to encode token");

        assert_eq!(token.split('.').count(), 3);
        assert!(token.split('.').all(|segment| !segment.is_empty()));
    }

    #[test]
    fn test_encode_wire_format() {
        let codec = TokenCodec::new(SECRET, Duration::zero());

        let token = codec.encode(&alice()).unwrap();
        let parts = segments(&token);

        assert_eq!(
            BASE64.decode(&parts[0]).unwrap(),
            br#"{"alg":"HS256","typ":"JWT"}"#.to_vec()
        );
        assert_eq!(
            BASE64.decode(&parts[1]).unwrap(),
            br#"{"user":"alice","name":"Alice Liddell"}"#.to_vec()
        );
        assert_eq!(parts[2].len(), 64);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_encode_writes_rfc3339_expiry_when_ttl_set() {
        let codec = TokenCodec::new(SECRET, Duration::seconds(90));

        let token = codec.encode_at(&alice(), issued_at()).unwrap();
        let payload = BASE64.decode(&segments(&token)[1]).unwrap();
        let claims: HashMap<String, String> = serde_json::from_slice(&payload).unwrap();

        assert_eq!(claims["expires"], "2026-10-14T12:01:30Z");
    }

    #[test]
    fn test_sub_second_issue_never_shortens_ttl() {
        let codec = TokenCodec::new(SECRET, Duration::seconds(1));
        let issued_at = issued_at() + Duration::milliseconds(900);

        let token = codec.encode_at(&alice(), issued_at).unwrap();
        let payload = BASE64.decode(&segments(&token)[1]).unwrap();
        let claims: HashMap<String, String> = serde_json::from_slice(&payload).unwrap();
        assert_eq!(claims["expires"], "2026-10-14T12:00:02Z");

        assert!(codec
            .decode_at(&token, issued_at + Duration::milliseconds(200))
            .is_ok());
        assert!(codec
            .decode_at(&token, issued_at + Duration::milliseconds(999))
            .is_ok());
        assert_eq!(
            codec.decode_at(&token, self::issued_at() + Duration::seconds(2)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_round_trip() {
        let codec = TokenCodec::new(SECRET, Duration::seconds(60));

        let token = codec.encode(&alice()).unwrap();
        let decoded = codec.decode(&token).expect("Failed to decode token");

        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.name, "Alice Liddell");
        assert!(decoded.expires.is_some());
    }

    #[test]
    fn test_token_without_expiry_never_expires() {
        let codec = TokenCodec::new(SECRET, Duration::zero());

        let token = codec.encode_at(&alice(), issued_at()).unwrap();
        let decoded = codec
            .decode_at(&token, issued_at() + Duration::days(365 * 100))
            .expect("Token without expiry must stay valid");

        assert_eq!(decoded.expires, None);
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = TokenCodec::new(SECRET, Duration::seconds(60));
        let token = codec.encode_at(&alice(), issued_at()).unwrap();

        assert!(codec
            .decode_at(&token, issued_at() + Duration::seconds(59))
            .is_ok());
        assert_eq!(
            codec.decode_at(&token, issued_at() + Duration::seconds(60)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let codec = TokenCodec::new(SECRET, Duration::seconds(-60));

        let token = codec.encode(&alice()).unwrap();

        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_concrete_alice_scenario() {
        let codec = TokenCodec::new(b"test-secret", Duration::zero());
        let token = codec.encode(&Principal::new("alice", "alice")).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.decode(&token).unwrap().username, "alice");

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'a' { 'b' } else { 'a' });

        assert_eq!(codec.decode(&tampered), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_any_header_or_payload_mutation_invalidates_signature() {
        let codec = TokenCodec::new(SECRET, Duration::seconds(3600));
        let token = codec.encode(&alice()).unwrap();
        let parts = segments(&token);

        for segment_index in 0..2 {
            for char_index in 0..parts[segment_index].len() {
                let mut mutated = parts.clone();
                mutated[segment_index] = replace_char(&parts[segment_index], char_index);

                assert_eq!(
                    codec.decode(&mutated.join(".")),
                    Err(TokenError::SignatureInvalid),
                    "mutation at segment {} index {} was accepted",
                    segment_index,
                    char_index
                );
            }
        }
    }

    #[test]
    fn test_whitespace_and_reordering_invalidate_signature() {
        let codec = TokenCodec::new(SECRET, Duration::zero());
        let token = codec.encode(&alice()).unwrap();
        let parts = segments(&token);

        let reordered = format!("{}.{}.{}", parts[1], parts[0], parts[2]);

        assert_eq!(
            codec.decode(&format!(" {}", token)),
            Err(TokenError::SignatureInvalid)
        );
        assert_eq!(
            codec.decode(&format!("{}\n", token)),
            Err(TokenError::SignatureInvalid)
        );
        assert_eq!(codec.decode(&reordered), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_uppercase_signature_is_rejected() {
        let codec = TokenCodec::new(SECRET, Duration::zero());
        let token = codec.encode(&alice()).unwrap();
        let parts = segments(&token);

        let uppercased = format!("{}.{}.{}", parts[0], parts[1], parts[2].to_uppercase());

        assert_eq!(codec.decode(&uppercased), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let issuer = TokenCodec::new(b"secret1", Duration::zero());
        let verifier = TokenCodec::new(b"secret2", Duration::zero());

        let token = issuer.encode(&alice()).unwrap();

        assert_eq!(verifier.decode(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_decode_rejects_wrong_segment_layout() {
        let codec = TokenCodec::new(SECRET, Duration::zero());

        for token in ["ABC123", "a.b", "a.b.c.d", "a..c", ".b.c", "a.b.", ""] {
            assert!(
                matches!(codec.decode(token), Err(TokenError::FormatInvalid(_))),
                "token {:?} was not rejected as malformed",
                token
            );
        }
    }

    #[test]
    fn test_signed_garbage_payload_is_format_invalid() {
        let codec = TokenCodec::new(SECRET, Duration::zero());
        let header = encode_segment(&HEADER).unwrap();

        let payloads = [
            "!!not-base64!!".to_string(),
            BASE64.encode("not json"),
            BASE64.encode(r#"["alice"]"#),
            BASE64.encode(r#"{"user":"alice","admin":true}"#),
            BASE64.encode(r#"{"name":"Alice"}"#),
        ];

        for payload in payloads {
            let signing_input = format!("{}.{}", header, payload);
            let token = format!("{}.{}", signing_input, codec.sign(&signing_input).unwrap());

            assert!(
                matches!(codec.decode(&token), Err(TokenError::FormatInvalid(_))),
                "payload {:?} was not rejected as malformed",
                payload
            );
        }
    }

    #[test]
    fn test_unparseable_expiry_is_format_invalid() {
        let codec = TokenCodec::new(SECRET, Duration::zero());
        let header = encode_segment(&HEADER).unwrap();

        for expires in ["tomorrow", "2026-10-14 12:00:00.123 +0000 UTC"] {
            let payload = encode_segment(&Payload {
                user: "alice",
                name: "Alice",
                expires: Some(expires.to_string()),
            })
            .unwrap();
            let signing_input = format!("{}.{}", header, payload);
            let token = format!("{}.{}", signing_input, codec.sign(&signing_input).unwrap());

            assert!(matches!(
                codec.decode(&token),
                Err(TokenError::FormatInvalid(_))
            ));
        }
    }

    #[test]
    fn test_expiry_is_checked_before_claims() {
        let codec = TokenCodec::new(SECRET, Duration::zero());
        let header = encode_segment(&HEADER).unwrap();
        let payload = BASE64.encode(r#"{"name":"Alice","expires":"2026-10-14T11:00:00Z"}"#);
        let signing_input = format!("{}.{}", header, payload);
        let token = format!("{}.{}", signing_input, codec.sign(&signing_input).unwrap());

        assert_eq!(codec.decode_at(&token, issued_at()), Err(TokenError::Expired));
    }

    #[test]
    fn test_signature_is_checked_before_payload() {
        let codec = TokenCodec::new(SECRET, Duration::zero());

        let token = format!("{}.!!not-base64!!.deadbeef", encode_segment(&HEADER).unwrap());

        assert_eq!(codec.decode(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            TokenError::FormatInvalid(String::new()).code(),
            "auth.jwt.validation.format.invalid"
        );
        assert_eq!(
            TokenError::SignatureInvalid.code(),
            "auth.jwt.validation.sign.invalid"
        );
        assert_eq!(TokenError::Expired.code(), "auth.jwt.validation.expired");
    }
}
