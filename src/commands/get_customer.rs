use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{supplied, Criterion, Customer, CustomerId, Phone},
    ports::database::DirectoryPort,
};
use tower::Service;

use super::{DomainLogic, Error};

/// Look up a single customer
///
/// Only one key is used, picked in order: `id`, then `phone`, then `email`.
#[derive(Clone, Debug, Default)]
pub struct GetCustomerRequest {
    pub id: Option<CustomerId>,
    pub phone: Option<Phone>,
    pub email: Option<String>,
}

impl GetCustomerRequest {
    pub fn by_id(id: CustomerId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn by_phone(phone: u64) -> Self {
        Self {
            phone: Some(Phone(phone)),
            ..Default::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    fn criterion(self) -> Result<Criterion, Error> {
        if let Some(id) = self.id {
            return Ok(Criterion::Id(id));
        }
        if let Some(phone) = supplied(self.phone) {
            return Ok(Criterion::Phone(phone));
        }
        if let Some(email) = supplied(self.email) {
            return Ok(Criterion::Email(email));
        }
        Err(Error::InvalidCriterion)
    }
}

impl<D, I> Service<GetCustomerRequest> for DomainLogic<D, I>
where
    D: DirectoryPort + 'static,
{
    type Response = Customer;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: GetCustomerRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            get_customer(&*database, req)
                .await
                .map_err(|err| err.logged("get customer"))
        })
    }
}

async fn get_customer<D>(database: &D, req: GetCustomerRequest) -> Result<Customer, Error>
where
    D: DirectoryPort + ?Sized,
{
    let criterion = req.criterion()?;
    let customer = match &criterion {
        Criterion::Id(id) => database.get(*id).await?,
        Criterion::Phone(phone) => database.find_by_phone(*phone).await?,
        Criterion::Email(email) => database.find_by_email(email).await?,
    };

    customer.ok_or(Error::NotFound(criterion))
}
