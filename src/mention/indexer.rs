use chrono::Utc;
use tracing::{debug, info, warn};

use crate::entry::{self, Mention, ParsedDocument};
use crate::store::partitions::encode_mention_key;
use crate::store::{BlogStore, Result};
use crate::timecodec;

use super::routes::{Route, RouteResolver};

/// What happened to a verified mention.
///
/// The raw payload is logged in every case; only `Attached` changes an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionOutcome {
    /// Appended to the entry with this identifier.
    Attached { id: String },
    /// The entry exists but its kind does not collect mentions.
    Unsupported { id: String },
    /// The identifier does not address a readable entry.
    MissingEntry { id: String },
    /// The target is not a single-entry page of this site.
    NotAnEntry,
}

/// Attaches verified mentions to the entries they point at.
pub struct MentionIndexer<R> {
    store: BlogStore,
    routes: R,
}

impl<R: RouteResolver> MentionIndexer<R> {
    pub fn new(store: BlogStore, routes: R) -> Self {
        Self { store, routes }
    }

    /// Handle a mention whose source page has already been fetched and
    /// parsed by the verifier.
    pub fn on_mention(
        &self,
        source: &str,
        target: &str,
        payload: &ParsedDocument,
    ) -> Result<MentionOutcome> {
        info!(source, target, "Mention received");
        self.log_raw(source, target, payload)?;

        let id = match self.routes.resolve(target) {
            Some(Route::Entry { id }) => id,
            other => {
                debug!(target, route = ?other, "Mention target is not an entry");
                return Ok(MentionOutcome::NotAnEntry);
            }
        };

        let Some(key) = timecodec::identifier_to_key(&id) else {
            warn!(target, id, "Mention target carries a malformed identifier");
            return Ok(MentionOutcome::MissingEntry { id });
        };

        let origin = entry::find_entry(payload).cloned();

        // Load, append and store under one write transaction so concurrent
        // mentions of the same entry cannot drop each other.
        let mut tx = self.store.keyspace.write_tx();
        let Some(mut post) = tx
            .get(&self.store.entries, &key)?
            .and_then(|value| entry::unmarshal(&value))
        else {
            warn!(target, id, "Mention target entry not found");
            return Ok(MentionOutcome::MissingEntry { id });
        };

        let mention = Mention {
            source: source.to_string(),
            published: Utc::now(),
            data: origin,
        };
        if !post.push_mention(mention) {
            debug!(id, kind = post.kind().as_str(), "Entry kind does not collect mentions");
            return Ok(MentionOutcome::Unsupported { id });
        }

        tx.insert(&self.store.entries, key, entry::marshal(&post)?);
        tx.commit()?;

        info!(id, source, mentions = post.mentions().len(), "Mention attached");
        Ok(MentionOutcome::Attached { id })
    }

    /// Raw payload last delivered for a (source, target) pair.
    pub fn raw_mention(&self, source: &str, target: &str) -> Result<Option<ParsedDocument>> {
        let tx = self.store.keyspace.read_tx();
        match tx.get(&self.store.mentions, encode_mention_key(source, target))? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    pub fn routes(&self) -> &R {
        &self.routes
    }

    fn log_raw(&self, source: &str, target: &str, payload: &ParsedDocument) -> Result<()> {
        let value = serde_json::to_vec(payload)?;

        let mut tx = self.store.keyspace.write_tx();
        tx.insert(&self.store.mentions, encode_mention_key(source, target), value);
        tx.commit()?;
        Ok(())
    }
}
