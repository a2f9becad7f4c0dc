use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{supplied, Criterion, Customer, CustomerChanges, CustomerId, Phone},
    ports::database::DirectoryPort,
};
use tower::Service;

use super::{DomainLogic, Error};

/// Overwrite some fields of an existing customer
///
/// Empty strings and zero numbers are ignored like missing fields, so `points` cannot be reset
/// to 0 through an update. Phone and email are not checked against other customers.
#[derive(Clone, Debug)]
pub struct UpdateCustomerRequest {
    pub id: CustomerId,
    pub phone: Option<Phone>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub points: Option<i64>,
}

impl UpdateCustomerRequest {
    /// An update that changes nothing
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            phone: None,
            email: None,
            name: None,
            password: None,
            points: None,
        }
    }

    fn changes(self) -> CustomerChanges {
        CustomerChanges {
            phone: supplied(self.phone),
            email: supplied(self.email),
            name: supplied(self.name),
            password: supplied(self.password),
            points: supplied(self.points),
        }
    }
}

impl<D, I> Service<UpdateCustomerRequest> for DomainLogic<D, I>
where
    D: DirectoryPort + 'static,
{
    type Response = Customer;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: UpdateCustomerRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            let id = req.id;
            let customer = database
                .update(id, req.changes())
                .await
                .map_err(Error::from)
                .and_then(|customer| customer.ok_or(Error::NotFound(Criterion::Id(id))))
                .map_err(|err| err.logged("update customer"))?;

            tracing::info!(customer_id = %id, name = %customer.name, "updated customer");

            Ok(customer)
        })
    }
}
