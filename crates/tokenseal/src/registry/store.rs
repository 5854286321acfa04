//! [`InstanceRegistry`]: name-keyed cache of encryption contexts.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{OnceCell, RwLock};
use tracing::{info, warn};

use crate::config::ConfigSource;
use crate::crypto::{CipherId, EncryptionContext};
use crate::error::Error;

/// Name of the group used when the caller does not pick one.
pub const DEFAULT_INSTANCE: &str = "default";

type Slot = Arc<OnceCell<Arc<EncryptionContext>>>;

/// Process-wide cache of [`EncryptionContext`]s keyed by configuration group.
///
/// Each name moves from unresolved to constructed exactly once:
/// - The slot map is locked only to find or insert a name's slot, never
///   while a context is being built, so slow groups do not stall others.
/// - Each slot is a [`OnceCell`]; concurrent first callers of the same name
///   wait on a single initialiser.
/// - A failed construction is not cached; its empty slot is dropped and the
///   next call retries.
///
/// Cheap to clone; clones share the same cache.
pub struct InstanceRegistry<S> {
    source: Arc<S>,
    slots: Arc<RwLock<HashMap<String, Slot>>>,
}

impl<S> Clone for InstanceRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<S: ConfigSource> InstanceRegistry<S> {
    /// Create an empty registry reading groups from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            slots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return the context for group `name`, constructing it on first use.
    ///
    /// Repeat calls return the same `Arc`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingKey`] if the group is absent or has no key.
    /// - [`Error::UnsupportedCipher`] if the cipher token is unknown.
    /// - Any construction error from [`EncryptionContext::new`].
    ///
    /// Errors are not cached.
    pub async fn get(&self, name: &str) -> Result<Arc<EncryptionContext>, Error> {
        let slot = self.slot(name).await;
        match slot.get_or_try_init(|| self.construct(name)).await {
            Ok(ctx) => Ok(Arc::clone(ctx)),
            Err(e) => {
                self.evict(name, &slot).await;
                Err(e)
            }
        }
    }

    /// Shorthand for `get(DEFAULT_INSTANCE)`.
    pub async fn default_instance(&self) -> Result<Arc<EncryptionContext>, Error> {
        self.get(DEFAULT_INSTANCE).await
    }

    /// Resolve every group in `names`, stopping at the first failure.
    ///
    /// Use at startup so misconfiguration surfaces before traffic arrives.
    pub async fn preload<I, N>(&self, names: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        for name in names {
            self.get(name.as_ref()).await?;
        }
        Ok(())
    }

    /// Returns `true` if `name` has a constructed context.
    pub async fn contains(&self, name: &str) -> bool {
        self.slots
            .read()
            .await
            .get(name)
            .is_some_and(|slot| slot.initialized())
    }

    /// Number of constructed contexts.
    pub async fn len(&self) -> usize {
        self.slots
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Returns `true` if no context has been constructed yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Find or insert the slot for `name`. Holds the map lock only briefly.
    async fn slot(&self, name: &str) -> Slot {
        if let Some(slot) = self.slots.read().await.get(name) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(name.to_owned()).or_default())
    }

    /// Drop an empty slot after a failed construction so unresolvable names
    /// do not accumulate. Left alone while another caller still holds it.
    async fn evict(&self, name: &str, slot: &Slot) {
        let mut slots = self.slots.write().await;
        let idle = slots.get(name).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(slot) == 2
        });
        if idle {
            slots.remove(name);
        }
    }

    async fn construct(&self, name: &str) -> Result<Arc<EncryptionContext>, Error> {
        let result = self.build(name).await;
        match &result {
            Ok(ctx) => info!(group = name, cipher = %ctx.cipher(), "encryption instance created"),
            Err(e) => warn!(group = name, error = %e, "encryption instance construction failed"),
        }
        result
    }

    async fn build(&self, name: &str) -> Result<Arc<EncryptionContext>, Error> {
        let group = self.source.group(name).await?.unwrap_or_default();

        let key = match group.key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(Error::MissingKey(name.to_owned())),
        };

        let cipher = match group.cipher.as_deref() {
            Some(token) => token.parse()?,
            None => CipherId::default(),
        };

        Ok(Arc::new(EncryptionContext::new(key.as_bytes(), cipher)?))
    }
}
