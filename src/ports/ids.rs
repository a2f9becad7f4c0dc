use crate::domain::CustomerId;

/// Source of fresh customer identifiers
#[mockall::automock]
pub trait IdPort {
    fn next_id(&self) -> Result<CustomerId, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying generator failed, e.g. the system entropy source is unavailable
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
