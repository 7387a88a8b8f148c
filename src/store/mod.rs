/// Fjall-based persistence for entries, subscribers, the profile, and the
/// raw mention log
///
/// ## Layout
///
/// One transactional keyspace with four partitions (see [`partitions`]):
///
/// - `config`: the singleton [`Profile`]
/// - `entries`: entry envelopes keyed by `timecodec::encode_key(published)`
/// - `subscriptions`: hub subscribers keyed by fixed-width id
/// - `mentions`: raw verified mention payloads keyed by source and target
///
/// ## Concurrency
///
/// `BlogStore` is cheap to clone and shared by all handlers. Reads observe a
/// snapshot (`read_tx`); writes are serialized by the keyspace's single
/// writer (`write_tx`), so no extra locking is needed.
///
/// ## Usage
///
/// ```rust,ignore
/// use indieserv::store::BlogStore;
///
/// let store = BlogStore::open("data/blog")?;
/// let entry = store.entries().publish(entry)?;
/// let latest = store.entries().list_reverse_chronological(false).next();
/// ```

pub mod entries;
pub mod error;
pub mod partitions;
pub mod profile;
#[allow(clippy::module_inception)]
pub mod store;
pub mod subscriptions;

pub use entries::{EntryIter, EntryStore};
pub use error::{Result, StoreError};
pub use profile::{Profile, ProfileStore};
pub use store::{BlogStore, StoreStats};
pub use subscriptions::{Subscription, SubscriptionStore};
