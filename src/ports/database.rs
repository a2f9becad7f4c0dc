use crate::domain::{Customer, CustomerChanges, CustomerId, Phone, PointsDelta};

#[mockall::automock]
#[async_trait::async_trait]
pub trait DirectoryPort {
    async fn get(&self, id: CustomerId) -> Result<Option<Customer>, Error>;
    async fn find_by_phone(&self, phone: Phone) -> Result<Option<Customer>, Error>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, Error>;
    /// All customers, in insertion order
    async fn list(&self) -> Result<Vec<Customer>, Error>;
    /// Store a new customer
    ///
    /// Implementations must reject a customer whose phone or email is already taken, checking the
    /// phone first.
    async fn insert(&self, customer: Customer) -> Result<Customer, Error>;
    async fn remove(&self, id: CustomerId) -> Result<Option<Customer>, Error>;
    /// Overwrite the supplied fields
    ///
    /// Uniqueness of phone and email is not checked here.
    async fn update(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, Error>;
    async fn adjust_points(
        &self,
        id: CustomerId,
        delta: PointsDelta,
    ) -> Result<Option<Customer>, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a customer with phone number {0} already exists")]
    DuplicatePhone(Phone),
    #[error("a customer with email {0} already exists")]
    DuplicateEmail(String),

    /// The new balance does not fit in an `i64`
    #[error("cannot apply {delta} points to a balance of {current_points}")]
    PointsOverflow {
        current_points: i64,
        delta: PointsDelta,
    },

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
