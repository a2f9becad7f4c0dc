use std::sync::Arc;

use tower::{Service, ServiceExt};

use crate::{
    domain::{Criterion, Customer, CustomerId, Phone, PointsDelta},
    ports::{self, database::DirectoryPort},
};

pub mod add_points;
pub mod create_customer;
pub mod delete_customer;
pub mod get_customer;
pub mod list_customers;
pub mod remove_points;
pub mod update_customer;

pub use add_points::AddPointsRequest;
pub use create_customer::CreateCustomerRequest;
pub use delete_customer::DeleteCustomerRequest;
pub use get_customer::GetCustomerRequest;
pub use list_customers::ListCustomersRequest;
pub use remove_points::RemovePointsRequest;
pub use update_customer::UpdateCustomerRequest;

pub struct DomainLogic<D, I> {
    database: Arc<D>,
    ids: Arc<I>,
}

impl<D, I> DomainLogic<D, I> {
    pub fn new(database: Arc<D>, ids: Arc<I>) -> Self {
        Self { database, ids }
    }

    /// Wait for readiness, then handle a single request
    pub async fn handle<R>(&mut self, req: R) -> Result<<Self as Service<R>>::Response, Error>
    where
        Self: Service<R, Error = Error>,
    {
        let service = ServiceExt::<R>::ready(self).await?;
        Service::<R>::call(service, req).await
    }
}

impl<D, I> Clone for DomainLogic<D, I> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            ids: self.ids.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Required fields were missing, empty or zero
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("a customer with phone number {0} already exists")]
    DuplicatePhone(Phone),
    #[error("a customer with email {0} already exists")]
    DuplicateEmail(String),
    #[error("no customer with {0}")]
    NotFound(Criterion),
    /// None of id, phone or email was supplied to a lookup
    #[error("no valid search criteria provided")]
    InvalidCriterion,
    #[error("cannot apply {delta} points to a balance of {current_points}")]
    PointsOverflow {
        current_points: i64,
        delta: PointsDelta,
    },

    #[error("database port error: {0:?}")]
    Database(#[source] ports::database::Error),
    #[error("id port error: {0:?}")]
    Ids(#[from] ports::ids::Error),
}

impl Error {
    /// Whether this is an unexpected fault rather than a rejected request
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Ids(_))
    }

    fn logged(self, operation: &'static str) -> Self {
        if self.is_internal() {
            tracing::error!(operation, error = %self, "operation failed");
        } else {
            tracing::warn!(operation, error = %self, "request rejected");
        }
        self
    }
}

impl From<ports::database::Error> for Error {
    fn from(err: ports::database::Error) -> Self {
        use ports::database::Error as DatabaseError;

        match err {
            DatabaseError::DuplicatePhone(phone) => Error::DuplicatePhone(phone),
            DatabaseError::DuplicateEmail(email) => Error::DuplicateEmail(email),
            DatabaseError::PointsOverflow {
                current_points,
                delta,
            } => Error::PointsOverflow {
                current_points,
                delta,
            },
            err => Error::Database(err),
        }
    }
}

/// Shared by [`AddPointsRequest`] and [`RemovePointsRequest`]
async fn adjust_points<D>(database: &D, id: CustomerId, delta: PointsDelta) -> Result<i64, Error>
where
    D: DirectoryPort + ?Sized,
{
    let customer: Customer = database
        .adjust_points(id, delta)
        .await?
        .ok_or(Error::NotFound(Criterion::Id(id)))?;

    tracing::info!(
        customer_id = %id,
        name = %customer.name,
        delta = %delta,
        points = customer.points,
        "adjusted points"
    );

    Ok(customer.points)
}
