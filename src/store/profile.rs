use fjall::{TxKeyspace, TxPartitionHandle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::Result;
use super::partitions::PROFILE_KEY;

/// The site owner. One per install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Profile {
    pub name: String,
    #[serde(rename = "HomeURL")]
    pub home_url: String,
    pub github: String,
    pub host: String,
    /// Login credential; kept out of anything served to readers.
    #[serde(default)]
    pub password: String,
}

/// Singleton profile record in the `config` partition
#[derive(Clone)]
pub struct ProfileStore {
    keyspace: TxKeyspace,
    partition: TxPartitionHandle,
}

impl ProfileStore {
    pub(crate) fn new(keyspace: TxKeyspace, partition: TxPartitionHandle) -> Self {
        Self { keyspace, partition }
    }

    pub fn get(&self) -> Result<Option<Profile>> {
        let tx = self.keyspace.read_tx();
        match tx.get(&self.partition, PROFILE_KEY)? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    pub fn put(&self, profile: &Profile) -> Result<()> {
        let value = serde_json::to_vec(profile)?;

        let mut tx = self.keyspace.write_tx();
        tx.insert(&self.partition, PROFILE_KEY, value);
        tx.commit()?;

        debug!(name = %profile.name, "Stored profile");
        Ok(())
    }
}
