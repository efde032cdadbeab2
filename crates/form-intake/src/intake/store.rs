use super::domain::{NewsletterSubscription, Stored};

/// Append-only record store for one submission kind. Implementations assign
/// the identifier and timestamp at insert time and must be safe for use by
/// concurrent callers; the intake core adds no locking of its own.
pub trait RecordStore<T>: Send + Sync {
    fn insert(&self, fields: T) -> Result<Stored<T>, StoreError>;
}

/// Newsletter store: uniqueness on the normalized email is enforced here,
/// atomically, so two concurrent subscribes for the same address cannot both
/// insert. A duplicate insert yields `StoreError::Conflict`.
pub trait SubscriptionStore: RecordStore<NewsletterSubscription> {
    fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Stored<NewsletterSubscription>>, StoreError>;
}

/// Storage-layer failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record rejected by store: {0}")]
    InvalidRecord(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
