//! Tagged envelope for stored entries
//!
//! Layout (JSON):
//!
//! ```json
//! {"Type": "note", "Content": {"Published": "...", "Mentions": [], "Message": "...", "Draft": false}}
//! ```
//!
//! Adding an entry kind means one `TYPE_*` tag plus one arm in [`encode`] and
//! [`decode`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::{Article, Entry, Note};

pub const TYPE_NOTE: &str = "note";
pub const TYPE_ARTICLE: &str = "article";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown entry type: {0}")]
    UnknownKind(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Content")]
    content: Value,
}

fn encode(entry: &Entry) -> Result<Envelope, serde_json::Error> {
    let content = match entry {
        Entry::Note(note) => serde_json::to_value(note)?,
        Entry::Article(article) => serde_json::to_value(article)?,
    };
    Ok(Envelope {
        kind: entry.kind().as_str().to_string(),
        content,
    })
}

/// Serialize an entry into its stored envelope.
pub fn marshal(entry: &Entry) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&encode(entry)?)
}

/// Decode an envelope, reporting why it could not be read.
pub fn decode(data: &[u8]) -> Result<Entry, EnvelopeError> {
    let envelope: Envelope = serde_json::from_slice(data)?;
    match envelope.kind.as_str() {
        TYPE_NOTE => Ok(Entry::Note(Note::deserialize(envelope.content)?)),
        TYPE_ARTICLE => Ok(Entry::Article(Article::deserialize(envelope.content)?)),
        _ => Err(EnvelopeError::UnknownKind(envelope.kind)),
    }
}

/// Decode an envelope; anything unreadable is simply absent.
pub fn unmarshal(data: &[u8]) -> Option<Entry> {
    match decode(data) {
        Ok(entry) => Some(entry),
        Err(err) => {
            debug!(error = %err, "Envelope not decodable");
            None
        }
    }
}
