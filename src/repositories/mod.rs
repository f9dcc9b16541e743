mod key_store;

pub use key_store::{CollisionPolicy, KeyStore, UrlStore};

#[cfg(test)]
pub use key_store::MockUrlStore;
