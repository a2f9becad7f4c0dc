use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{supplied, Customer, NewCustomer, Phone},
    ports::{database::DirectoryPort, ids::IdPort},
};
use tower::Service;

use super::{DomainLogic, Error};

/// Register a new customer
///
/// All four fields are required. Empty strings and a zero phone number count as missing.
#[derive(Clone, Debug, Default)]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<Phone>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CreateCustomerRequest {
    pub fn new(
        name: impl Into<String>,
        phone: u64,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            phone: Some(Phone(phone)),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    fn validate(self) -> Result<NewCustomer, Error> {
        let name = supplied(self.name);
        let phone = supplied(self.phone);
        let email = supplied(self.email);
        let password = supplied(self.password);

        match (name, phone, email, password) {
            (Some(name), Some(phone), Some(email), Some(password)) => Ok(NewCustomer {
                name,
                phone,
                email,
                password,
            }),
            (name, phone, email, password) => {
                let missing = [
                    ("name", name.is_none()),
                    ("phone", phone.is_none()),
                    ("email", email.is_none()),
                    ("password", password.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, missing)| missing.then_some(field))
                .collect();
                Err(Error::MissingFields(missing))
            }
        }
    }
}

impl<D, I> Service<CreateCustomerRequest> for DomainLogic<D, I>
where
    D: DirectoryPort + 'static,
    I: IdPort + 'static,
{
    type Response = Customer;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CreateCustomerRequest) -> Self::Future {
        let database = self.database.clone();
        let ids = self.ids.clone();
        Box::pin(async move {
            create_customer(&*database, &*ids, req)
                .await
                .map_err(|err| err.logged("create customer"))
        })
    }
}

async fn create_customer<D, I>(
    database: &D,
    ids: &I,
    req: CreateCustomerRequest,
) -> Result<Customer, Error>
where
    D: DirectoryPort + ?Sized,
    I: IdPort + ?Sized,
{
    // Checks run in a fixed order and stop at the first failure
    let details = req.validate()?;
    if database.find_by_phone(details.phone).await?.is_some() {
        return Err(Error::DuplicatePhone(details.phone));
    }
    if database.find_by_email(&details.email).await?.is_some() {
        return Err(Error::DuplicateEmail(details.email));
    }

    let id = ids.next_id()?;
    let customer = database.insert(Customer::new(id, details)).await?;

    tracing::info!(customer_id = %customer.id, name = %customer.name, "added customer");

    Ok(customer)
}
