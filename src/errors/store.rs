use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A thread panicked while holding the map lock
    #[error("URL store lock poisoned")]
    LockPoisoned,

    /// Every generated key was already taken
    #[error("Failed to generate a unique short key after {attempts} attempts")]
    KeysExhausted { attempts: usize },
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}
