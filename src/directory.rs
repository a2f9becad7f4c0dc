use std::sync::Arc;

use crate::{
    adapters::{database::memory::MemoryDatabase, ids::random::UuidGenerator},
    commands::{
        AddPointsRequest, CreateCustomerRequest, DeleteCustomerRequest, DomainLogic, Error,
        GetCustomerRequest, ListCustomersRequest, RemovePointsRequest, UpdateCustomerRequest,
    },
    domain::{Customer, CustomerId},
    ports::{database::DirectoryPort, ids::IdPort},
};

/// The customer directory
///
/// Each method is a single request to the underlying [`DomainLogic`] service. Failures are
/// returned as [`Error`] and logged; none of them panic.
pub struct CustomerDirectory<D, I> {
    logic: DomainLogic<D, I>,
}

impl CustomerDirectory<MemoryDatabase, UuidGenerator> {
    /// A directory that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryDatabase::default()), Arc::new(UuidGenerator))
    }
}

impl<D, I> CustomerDirectory<D, I>
where
    D: DirectoryPort + 'static,
    I: IdPort + 'static,
{
    pub fn new(database: Arc<D>, ids: Arc<I>) -> Self {
        Self {
            logic: DomainLogic::new(database, ids),
        }
    }

    pub async fn create(&mut self, req: CreateCustomerRequest) -> Result<Customer, Error> {
        self.logic.handle(req).await
    }

    /// Remove a customer, returning it
    pub async fn delete(&mut self, id: CustomerId) -> Result<Customer, Error> {
        self.logic.handle(DeleteCustomerRequest { id }).await
    }

    pub async fn find(&mut self, req: GetCustomerRequest) -> Result<Customer, Error> {
        self.logic.handle(req).await
    }

    pub async fn list_all(&mut self) -> Result<Vec<Customer>, Error> {
        self.logic.handle(ListCustomersRequest).await
    }

    pub async fn update(&mut self, req: UpdateCustomerRequest) -> Result<Customer, Error> {
        self.logic.handle(req).await
    }

    /// Returns the new balance
    pub async fn add_points(&mut self, id: CustomerId, points: i64) -> Result<i64, Error> {
        self.logic.handle(AddPointsRequest { id, points }).await
    }

    /// Returns the new balance
    pub async fn remove_points(&mut self, id: CustomerId, points: i64) -> Result<i64, Error> {
        self.logic.handle(RemovePointsRequest { id, points }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Phone;
    use rstest::*;
    use speculoos::prelude::*;
    use tower::BoxError;

    #[fixture]
    fn directory() -> CustomerDirectory<MemoryDatabase, UuidGenerator> {
        CustomerDirectory::in_memory()
    }

    #[rstest]
    #[tokio::test]
    async fn test_customer_lifecycle(
        mut directory: CustomerDirectory<MemoryDatabase, UuidGenerator>,
    ) -> Result<(), BoxError> {
        // A new customer starts with no points
        let req = CreateCustomerRequest::new("John Doe", 1234567890, "john@doe.io", "password");
        let customer = directory.create(req).await?;
        assert_that!(customer.points).is_equal_to(0);
        assert_that!(customer.id.to_string()).is_not_equal_to(String::new());

        // Same phone, different email
        let req = CreateCustomerRequest::new("John Doe", 1234567890, "some1@doe.io", "password");
        let res = directory.create(req).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::DuplicatePhone(Phone(1234567890))));
        assert_that!(directory.list_all().await?).has_length(1);

        // Same email, different phone
        let req = CreateCustomerRequest::new("John Doe", 2345678901, "john@doe.io", "password");
        let res = directory.create(req).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::DuplicateEmail(_)));
        assert_that!(directory.list_all().await?).has_length(1);

        // Lookups by email and phone agree
        let by_email = directory
            .find(GetCustomerRequest::by_email("john@doe.io"))
            .await?;
        let by_phone = directory
            .find(GetCustomerRequest::by_phone(1234567890))
            .await?;
        assert_that!(by_email).is_equal_to(&by_phone);
        assert_that!(by_email).is_equal_to(&customer);

        assert_that!(directory.add_points(customer.id, 100).await)
            .is_ok()
            .is_equal_to(100);
        assert_that!(directory.remove_points(customer.id, 50).await)
            .is_ok()
            .is_equal_to(50);

        let deleted = directory.delete(customer.id).await?;
        assert_that!(deleted.id).is_equal_to(customer.id);
        assert_that!(directory.list_all().await?).is_empty();
        let res = directory.find(GetCustomerRequest::by_id(customer.id)).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::NotFound(_)));

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_updates(
        mut directory: CustomerDirectory<MemoryDatabase, UuidGenerator>,
    ) -> Result<(), BoxError> {
        let req = CreateCustomerRequest::new("John Doe", 1234567890, "john@doe.io", "password");
        let customer = directory.create(req).await?;

        directory
            .update(UpdateCustomerRequest {
                name: Some("Jane Doe".to_string()),
                ..UpdateCustomerRequest::new(customer.id)
            })
            .await?;
        directory
            .update(UpdateCustomerRequest {
                email: Some("jane@doe.io".to_string()),
                ..UpdateCustomerRequest::new(customer.id)
            })
            .await?;
        directory
            .update(UpdateCustomerRequest {
                phone: Some(Phone(10987654321)),
                ..UpdateCustomerRequest::new(customer.id)
            })
            .await?;
        directory
            .update(UpdateCustomerRequest {
                password: Some("newpassword".to_string()),
                ..UpdateCustomerRequest::new(customer.id)
            })
            .await?;
        directory.add_points(customer.id, 20).await?;
        directory
            .update(UpdateCustomerRequest {
                points: Some(0),
                ..UpdateCustomerRequest::new(customer.id)
            })
            .await?;

        let stored = directory
            .find(GetCustomerRequest::by_id(customer.id))
            .await?;
        assert_that!(stored).is_equal_to(Customer {
            id: customer.id,
            phone: Phone(10987654321),
            email: "jane@doe.io".to_string(),
            name: "Jane Doe".to_string(),
            password: "newpassword".to_string(),
            // Setting points to zero through an update is ignored
            points: 20,
        });

        Ok(())
    }
}
