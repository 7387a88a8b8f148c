use chrono::TimeDelta;
use fjall::{ReadTransaction, Slice, TxKeyspace, TxPartitionHandle};
use tracing::{debug, warn};

use crate::entry::{self, Entry};
use crate::timecodec;

use super::error::Result;

type RawIter = Box<dyn Iterator<Item = std::result::Result<(Slice, Slice), fjall::Error>>>;

/// Entries keyed by their publish instant
///
/// Key order is publish order, so listing is a reverse range walk with no
/// secondary index. Draft filtering happens on read.
#[derive(Clone)]
pub struct EntryStore {
    keyspace: TxKeyspace,
    partition: TxPartitionHandle,
}

impl EntryStore {
    pub(crate) fn new(keyspace: TxKeyspace, partition: TxPartitionHandle) -> Self {
        Self { keyspace, partition }
    }

    /// Write an entry under its storage key, replacing whatever was there.
    pub fn put(&self, entry: &Entry) -> Result<()> {
        let key = entry.storage_key();
        let value = entry::marshal(entry)?;

        let mut tx = self.keyspace.write_tx();
        tx.insert(&self.partition, key, value);
        tx.commit()?;

        debug!(id = %entry.identifier(), kind = entry.kind().as_str(), "Stored entry");
        Ok(())
    }

    /// Store a new entry without clobbering an existing one.
    ///
    /// While the storage key is taken, the publish instant moves forward by
    /// one nanosecond. The returned entry carries the instant it was stored
    /// under, so its identifier addresses exactly this record.
    pub fn publish(&self, mut entry: Entry) -> Result<Entry> {
        let mut tx = self.keyspace.write_tx();
        while tx.contains_key(&self.partition, entry.storage_key())? {
            let next = entry.published() + TimeDelta::nanoseconds(1);
            entry.set_published(next);
        }
        tx.insert(&self.partition, entry.storage_key(), entry::marshal(&entry)?);
        tx.commit()?;

        debug!(id = %entry.identifier(), kind = entry.kind().as_str(), "Published entry");
        Ok(entry)
    }

    /// Look up an entry by its public identifier.
    ///
    /// Malformed identifiers, missing or undecodable records, and drafts
    /// hidden from this reader are all `None`.
    pub fn get_by_identifier(&self, id: &str, include_drafts: bool) -> Result<Option<Entry>> {
        let Some(key) = timecodec::identifier_to_key(id) else {
            debug!(id, "Malformed entry identifier");
            return Ok(None);
        };

        let tx = self.keyspace.read_tx();
        let Some(value) = tx.get(&self.partition, &key)? else {
            return Ok(None);
        };

        Ok(entry::unmarshal(&value).filter(|entry| entry.visible(include_drafts)))
    }

    /// Walk all entries, newest first, over one consistent snapshot.
    pub fn list_reverse_chronological(&self, include_drafts: bool) -> EntryIter {
        let snapshot = self.keyspace.read_tx();
        let inner: RawIter = Box::new(snapshot.iter(&self.partition).rev());
        EntryIter {
            _snapshot: snapshot,
            inner,
            include_drafts,
        }
    }
}

/// Lazy, newest-first scan over entries.
///
/// Undecodable records are skipped; storage failures are yielded as errors.
pub struct EntryIter {
    _snapshot: ReadTransaction,
    inner: RawIter,
    include_drafts: bool,
}

impl Iterator for EntryIter {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, value) = match self.inner.next()? {
                Ok(kv) => kv,
                Err(err) => return Some(Err(err.into())),
            };

            match entry::envelope::decode(&value) {
                Ok(entry) if entry.visible(self.include_drafts) => return Some(Ok(entry)),
                Ok(_) => continue,
                Err(err) => {
                    warn!(
                        key = %String::from_utf8_lossy(&key),
                        error = %err,
                        "Skipping undecodable entry"
                    );
                }
            }
        }
    }
}
