// src/repositories/key_store.rs - In-memory key -> URL table
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::{debug, warn};

use crate::errors::StoreError;
use crate::models::{ShortKey, UrlRecord};
use crate::utils::{KeyGenerator, RandomKeyGenerator};

type Result<T> = std::result::Result<T, StoreError>;

#[cfg_attr(test, mockall::automock)]
pub trait UrlStore: Send + Sync {
    /// Stores `target` under a freshly generated key
    ///
    /// ### Arguments
    /// * `target` - The original URL, already trimmed and known to be non-empty
    ///
    /// ### Returns
    /// * `Result<UrlRecord>` - The stored record, carrying the generated key
    ///
    /// ### Errors
    /// * `StoreError::KeysExhausted` - If retrying is enabled and every drawn key collided
    /// * `StoreError::LockPoisoned` - If the map lock is poisoned
    fn put(&self, target: &str) -> Result<UrlRecord>;

    /// Looks up a key without modifying anything
    ///
    /// ### Returns
    /// * `Result<Option<UrlRecord>>` - The record if present, or `None` if never written
    fn get(&self, key: &str) -> Result<Option<UrlRecord>>;

    /// Number of stored mappings
    fn len(&self) -> Result<usize>;
}

/// What `put` does when the drawn key is already taken
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Last write wins; the older mapping is silently replaced
    #[default]
    Overwrite,
    /// Draw a new key while the drawn one is taken, up to `max_attempts` draws
    Retry { max_attempts: usize },
}

impl CollisionPolicy {
    /// `0` retries keeps the overwrite behaviour
    pub fn from_retries(retries: usize) -> Self {
        if retries == 0 {
            Self::Overwrite
        } else {
            Self::Retry {
                max_attempts: retries,
            }
        }
    }
}

pub struct KeyStore {
    urls: RwLock<HashMap<ShortKey, UrlRecord>>,
    generator: Arc<dyn KeyGenerator>,
    policy: CollisionPolicy,
}

impl KeyStore {
    pub fn new(generator: Arc<dyn KeyGenerator>, policy: CollisionPolicy) -> Self {
        Self {
            urls: RwLock::new(HashMap::new()),
            generator,
            policy,
        }
    }

    pub fn with_key_length(key_length: usize, policy: CollisionPolicy) -> Self {
        Self::new(Arc::new(RandomKeyGenerator::new(key_length)), policy)
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new(Arc::new(RandomKeyGenerator::default()), CollisionPolicy::Overwrite)
    }
}

impl UrlStore for KeyStore {
    fn put(&self, target: &str) -> Result<UrlRecord> {
        let mut urls = self.urls.write()?;

        let key = match self.policy {
            CollisionPolicy::Overwrite => self.generator.generate(),
            CollisionPolicy::Retry { max_attempts } => {
                let mut free_key = None;
                for attempt in 1..=max_attempts {
                    let candidate = self.generator.generate();
                    if !urls.contains_key(&candidate) {
                        free_key = Some(candidate);
                        break;
                    }
                    debug!("Key '{}' taken, attempt {}/{}", candidate, attempt, max_attempts);
                }
                free_key.ok_or(StoreError::KeysExhausted {
                    attempts: max_attempts,
                })?
            }
        };

        let record = UrlRecord::new(key.clone(), target.to_string());
        if let Some(previous) = urls.insert(key, record.clone()) {
            warn!(
                "Key '{}' collided; '{}' replaced by '{}'",
                record.key, previous.target, record.target
            );
        }

        Ok(record)
    }

    fn get(&self, key: &str) -> Result<Option<UrlRecord>> {
        let urls = self.urls.read()?;
        Ok(urls.get(key).cloned())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.urls.read()?.len())
    }
}
