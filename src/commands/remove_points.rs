use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{CustomerId, PointsDelta},
    ports::database::DirectoryPort,
};
use tower::Service;

use super::{adjust_points, DomainLogic, Error};

/// Debit points from a customer
///
/// The balance has no floor and may end up negative.
pub struct RemovePointsRequest {
    pub id: CustomerId,
    pub points: i64,
}

impl<D, I> Service<RemovePointsRequest> for DomainLogic<D, I>
where
    D: DirectoryPort + 'static,
{
    /// New number of loyalty points
    type Response = i64;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RemovePointsRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            adjust_points(&*database, req.id, PointsDelta::Debit(req.points))
                .await
                .map_err(|err| err.logged("remove points"))
        })
    }
}
