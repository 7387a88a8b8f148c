use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fjall::{TxKeyspace, TxPartitionHandle};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::Result;
use super::partitions::{decode_subscription_key, encode_subscription_key};

/// A hub subscriber waiting for update pings on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub topic: String,
    pub callback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub lease_seconds: u64,
    pub created: DateTime<Utc>,
}

/// Subscriber state for update fan-out, keyed by numeric id
#[derive(Clone)]
pub struct SubscriptionStore {
    keyspace: TxKeyspace,
    partition: TxPartitionHandle,
}

impl SubscriptionStore {
    pub(crate) fn new(keyspace: TxKeyspace, partition: TxPartitionHandle) -> Self {
        Self { keyspace, partition }
    }

    pub fn add(&self, id: i64, sub: &Subscription) -> Result<()> {
        let value = serde_json::to_vec(sub)?;

        let mut tx = self.keyspace.write_tx();
        tx.insert(&self.partition, encode_subscription_key(id), value);
        tx.commit()?;

        debug!(id, topic = %sub.topic, "Stored subscription");
        Ok(())
    }

    pub fn remove(&self, id: i64) -> Result<()> {
        let mut tx = self.keyspace.write_tx();
        tx.remove(&self.partition, encode_subscription_key(id));
        tx.commit()?;

        debug!(id, "Removed subscription");
        Ok(())
    }

    /// All subscriptions, keyed by the id stored inside each record.
    pub fn list(&self) -> Result<HashMap<i64, Subscription>> {
        let tx = self.keyspace.read_tx();
        let mut subs = HashMap::new();

        for item in tx.iter(&self.partition) {
            let (key, value) = item?;
            match serde_json::from_slice::<Subscription>(&value) {
                Ok(sub) => {
                    subs.insert(sub.id, sub);
                }
                Err(err) => {
                    warn!(
                        key = ?decode_subscription_key(&key),
                        error = %err,
                        "Skipping undecodable subscription"
                    );
                }
            }
        }

        Ok(subs)
    }
}
