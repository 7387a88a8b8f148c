//! Timestamp encodings used to address entries
//!
//! Every entry is addressed by its publish instant in two forms:
//!
//! - a storage key: fixed-width UTC text with nanosecond precision, so that
//!   byte order of keys equals chronological order of instants
//!   (`2024-05-01T10:00:00.000000042Z`)
//! - a public identifier: the `(seconds, nanoseconds)` pair written as two
//!   zig-zag varints and encoded with the URL-safe base64 alphabet
//!
//! Decoding an identifier and re-deriving the storage key always lands on the
//! record the identifier was minted for. Key order tracks time order only for
//! years 0000 through 9999; instants outside that range still round-trip but
//! do not sort among the others.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Datelike, Timelike, Utc};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// URL-safe alphabet; identifiers are minted without padding but padded
/// tokens are still accepted.
const IDENTIFIER_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode an instant as its byte-ordered storage key.
///
/// Ordering holds for years 0000 through 9999.
pub fn encode_key(t: &DateTime<Utc>) -> Vec<u8> {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:09}Z",
        t.year(),
        t.month(),
        t.day(),
        t.hour(),
        t.minute(),
        t.second(),
        t.nanosecond(),
    )
    .into_bytes()
}

/// Decode a storage key back into its instant.
pub fn decode_key(key: &[u8]) -> Option<DateTime<Utc>> {
    let text = std::str::from_utf8(key).ok()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Encode an instant as a compact public identifier.
pub fn encode_identifier(t: &DateTime<Utc>) -> String {
    let mut buf = Vec::with_capacity(16);
    prost::encoding::encode_varint(zigzag(t.timestamp()), &mut buf);
    prost::encoding::encode_varint(zigzag(i64::from(t.timestamp_subsec_nanos())), &mut buf);
    IDENTIFIER_ENGINE.encode(buf)
}

/// Decode a public identifier.
///
/// Malformed tokens (bad alphabet, truncated or overlong varints, trailing
/// bytes, out-of-range instants) yield `None`, which callers treat as
/// "not found".
///
/// Any instant chrono can represent is accepted. Its storage key addresses
/// the right record, but listing order is only guaranteed for years 0000
/// through 9999 (see [`encode_key`]).
pub fn decode_identifier(token: &str) -> Option<DateTime<Utc>> {
    let raw = IDENTIFIER_ENGINE.decode(token.as_bytes()).ok()?;
    let mut buf = raw.as_slice();

    let secs = unzigzag(prost::encoding::decode_varint(&mut buf).ok()?);
    let nanos = unzigzag(prost::encoding::decode_varint(&mut buf).ok()?);
    if !buf.is_empty() {
        return None;
    }

    // Out-of-range nanoseconds are carried into the seconds field.
    let total = i128::from(secs) * NANOS_PER_SECOND + i128::from(nanos);
    let secs = i64::try_from(total.div_euclid(NANOS_PER_SECOND)).ok()?;
    let nanos = u32::try_from(total.rem_euclid(NANOS_PER_SECOND)).ok()?;
    DateTime::from_timestamp(secs, nanos)
}

/// Storage key addressed by a public identifier, if the identifier is valid.
pub fn identifier_to_key(token: &str) -> Option<Vec<u8>> {
    decode_identifier(token).map(|t| encode_key(&t))
}

fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

fn unzigzag(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, nanos: u32) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, nanos).unwrap()
    }

    #[test]
    fn test_key_format() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(42);
        assert_eq!(encode_key(&t), b"2024-05-01T10:00:00.000000042Z");
        assert_eq!(decode_key(&encode_key(&t)), Some(t));
    }

    #[test]
    fn test_key_order_matches_time_order() {
        // Sub-second precision is where variable-width renderings break order.
        let instants = [
            at(1_700_000_000, 0),
            at(1_700_000_000, 100_000_000),
            at(1_700_000_000, 120_000_000),
            at(1_700_000_000, 999_999_999),
            at(1_700_000_001, 0),
            at(1_800_000_000, 5),
        ];
        for pair in instants.windows(2) {
            assert!(encode_key(&pair[0]) < encode_key(&pair[1]));
        }
    }

    #[test]
    fn test_identifier_roundtrip_addresses_same_key() {
        let samples = [
            at(0, 0),
            at(1, 1),
            at(1_700_000_000, 123_456_789),
            at(-86_400, 999_999_999),
            at(253_402_300_799, 999_999_999),
        ];
        for t in samples {
            let token = encode_identifier(&t);
            let decoded = decode_identifier(&token).unwrap();
            assert_eq!(encode_key(&decoded), encode_key(&t), "token {token}");
        }
    }

    #[test]
    fn test_instants_outside_ordered_range_still_address_their_key() {
        let far_future = at(253_402_300_800, 7);
        let before_year_zero = at(-62_167_219_201, 0);
        for t in [far_future, before_year_zero] {
            let decoded = decode_identifier(&encode_identifier(&t)).unwrap();
            assert_eq!(decoded, t);
            assert_eq!(identifier_to_key(&encode_identifier(&t)), Some(encode_key(&t)));
        }
        assert!(encode_key(&far_future).starts_with(b"10000-"));
    }

    #[test]
    fn test_identifier_is_url_safe_and_short() {
        let token = encode_identifier(&at(1_700_000_000, 123_456_789));
        assert!(token.len() <= 12);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_identifier_matches_zigzag_varint_layout() {
        // secs=1 -> 0x02, nanos=1 -> 0x02
        assert_eq!(encode_identifier(&at(1, 1)), "AgI");
        assert_eq!(decode_identifier("AgI"), Some(at(1, 1)));
        // padded form is accepted as well
        assert_eq!(decode_identifier("AgI="), Some(at(1, 1)));
    }

    #[test]
    fn test_malformed_identifiers_fail_soft() {
        assert_eq!(decode_identifier(""), None);
        assert_eq!(decode_identifier("!!!"), None);
        // truncated varint: continuation bit set, nothing follows
        assert_eq!(decode_identifier("gA"), None);
        // only one varint present
        assert_eq!(decode_identifier("Ag"), None);
        // trailing garbage after both varints
        assert_eq!(decode_identifier("AgIC"), None);
        assert_eq!(identifier_to_key("not a token"), None);
    }

    #[test]
    fn test_zigzag() {
        for n in [0i64, 1, -1, 2, -2, i64::MAX, i64::MIN] {
            assert_eq!(unzigzag(zigzag(n)), n);
        }
        assert_eq!(zigzag(-1), 1);
        assert_eq!(zigzag(1), 2);
    }
}
