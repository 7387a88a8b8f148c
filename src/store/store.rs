use std::path::Path;

use fjall::{Config, PartitionCreateOptions, TxKeyspace, TxPartitionHandle};
use tracing::info;

use super::entries::EntryStore;
use super::error::Result;
use super::partitions;
use super::profile::ProfileStore;
use super::subscriptions::SubscriptionStore;

/// Fjall-backed persistence for the blog
///
/// One transactional keyspace shared by every request handler. Reads run in
/// snapshot transactions; writes go through the keyspace's single writer.
#[derive(Clone)]
pub struct BlogStore {
    pub(crate) keyspace: TxKeyspace,
    pub(crate) config: TxPartitionHandle,
    pub(crate) entries: TxPartitionHandle,
    pub(crate) subscriptions: TxPartitionHandle,
    pub(crate) mentions: TxPartitionHandle,
}

impl BlogStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening blog store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open_transactional()?;

        let config = keyspace.open_partition(partitions::CONFIG, PartitionCreateOptions::default())?;
        let entries = keyspace.open_partition(partitions::ENTRIES, PartitionCreateOptions::default())?;
        let subscriptions =
            keyspace.open_partition(partitions::SUBSCRIPTIONS, PartitionCreateOptions::default())?;
        let mentions = keyspace.open_partition(partitions::MENTIONS, PartitionCreateOptions::default())?;

        info!("Blog store opened successfully");
        Ok(Self {
            keyspace,
            config,
            entries,
            subscriptions,
            mentions,
        })
    }

    pub fn entries(&self) -> EntryStore {
        EntryStore::new(self.keyspace.clone(), self.entries.clone())
    }

    pub fn subscriptions(&self) -> SubscriptionStore {
        SubscriptionStore::new(self.keyspace.clone(), self.subscriptions.clone())
    }

    pub fn profile(&self) -> ProfileStore {
        ProfileStore::new(self.keyspace.clone(), self.config.clone())
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }

    /// Record counts per partition, taken from one snapshot
    pub fn stats(&self) -> Result<StoreStats> {
        let tx = self.keyspace.read_tx();
        Ok(StoreStats {
            entry_count: tx.len(&self.entries)?,
            subscription_count: tx.len(&self.subscriptions)?,
            raw_mention_count: tx.len(&self.mentions)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub entry_count: usize,
    pub subscription_count: usize,
    pub raw_mention_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use chrono::DateTime;
    use tempfile::TempDir;

    #[test]
    fn test_open_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = BlogStore::open(temp_dir.path().join("blog"));
        assert!(store.is_ok());
    }

    #[test]
    fn test_stats_and_persist() {
        let temp_dir = TempDir::new().unwrap();
        let store = BlogStore::open(temp_dir.path().join("blog")).unwrap();

        let published = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        store.entries().put(&Entry::note("hi", false, published)).unwrap();
        store.persist().unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.subscription_count, 0);
        assert_eq!(stats.raw_mention_count, 0);
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let temp_dir = TempDir::new().unwrap();
        let published = DateTime::from_timestamp(1_700_000_000, 7).unwrap();
        let id = {
            let store = BlogStore::open(temp_dir.path().join("blog")).unwrap();
            let entry = Entry::note("durable", false, published);
            store.entries().put(&entry).unwrap();
            store.persist().unwrap();
            entry.identifier()
        };

        let store = BlogStore::open(temp_dir.path().join("blog")).unwrap();
        let entry = store.entries().get_by_identifier(&id, false).unwrap().unwrap();
        assert_eq!(entry.published(), published);
    }
}
