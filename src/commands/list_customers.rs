use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{domain::Customer, ports::database::DirectoryPort};
use tower::Service;

use super::{DomainLogic, Error};

/// Every customer, in the order they were added
///
/// The response is a snapshot. Later changes to the directory are not reflected in it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListCustomersRequest;

impl<D, I> Service<ListCustomersRequest> for DomainLogic<D, I>
where
    D: DirectoryPort + 'static,
{
    type Response = Vec<Customer>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: ListCustomersRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            database
                .list()
                .await
                .map_err(|err| Error::from(err).logged("list customers"))
        })
    }
}
