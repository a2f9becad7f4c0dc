use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Criterion, Customer, CustomerId},
    ports::database::DirectoryPort,
};
use tower::Service;

use super::{DomainLogic, Error};

pub struct DeleteCustomerRequest {
    pub id: CustomerId,
}

impl<D, I> Service<DeleteCustomerRequest> for DomainLogic<D, I>
where
    D: DirectoryPort + 'static,
{
    /// The removed customer
    type Response = Customer;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: DeleteCustomerRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            let customer = database
                .remove(req.id)
                .await
                .map_err(Error::from)
                .and_then(|customer| customer.ok_or(Error::NotFound(Criterion::Id(req.id))))
                .map_err(|err| err.logged("delete customer"))?;

            tracing::info!(customer_id = %customer.id, "deleted customer");

            Ok(customer)
        })
    }
}
