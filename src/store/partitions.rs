/// Partition names and key layout
///
/// - `config`: `Profile` -> Profile (JSON)
/// - `entries`: {storage key} -> entry envelope (JSON), see `timecodec::encode_key`
/// - `subscriptions`: {id as i64 big-endian} -> Subscription (JSON)
/// - `mentions`: {source}-{target} -> ParsedDocument (JSON)

pub const CONFIG: &str = "config";
pub const ENTRIES: &str = "entries";
pub const SUBSCRIPTIONS: &str = "subscriptions";
pub const MENTIONS: &str = "mentions";

/// Fixed key of the singleton profile in the `config` partition.
pub const PROFILE_KEY: &[u8] = b"Profile";

/// Encode a subscription key: 8 bytes, big-endian.
pub fn encode_subscription_key(id: i64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Decode a subscription key, rejecting anything that is not 8 bytes.
pub fn decode_subscription_key(key: &[u8]) -> Option<i64> {
    key.try_into().ok().map(i64::from_be_bytes)
}

/// Encode a raw mention key: {source}-{target}
pub fn encode_mention_key(source: &str, target: &str) -> Vec<u8> {
    format!("{}-{}", source, target).into_bytes()
}
