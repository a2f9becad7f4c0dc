use crate::{
    domain::{Customer, CustomerChanges, CustomerId, Phone, PointsDelta},
    ports::database::{DirectoryPort, Error},
};
use std::{
    collections::{hash_map::Entry, BTreeMap, HashMap},
    sync::{Arc, Mutex, PoisonError},
};

#[derive(Clone, Debug)]
pub struct MemoryDatabase {
    customers: Arc<Mutex<Customers>>,
}

/// Customers keyed by insertion sequence, with an index from id to sequence
///
/// Sequence numbers only ever grow, so removing a customer never reorders the others.
#[derive(Debug, Default)]
struct Customers {
    next_seq: u64,
    by_seq: BTreeMap<u64, Customer>,
    seq_by_id: HashMap<CustomerId, u64>,
}

impl Customers {
    fn get(&self, id: CustomerId) -> Option<&Customer> {
        let seq = self.seq_by_id.get(&id)?;
        self.by_seq.get(seq)
    }

    fn get_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        let seq = self.seq_by_id.get(&id)?;
        self.by_seq.get_mut(seq)
    }

    fn find(&self, predicate: impl Fn(&Customer) -> bool) -> Option<&Customer> {
        self.by_seq.values().find(|customer| predicate(customer))
    }
}

#[async_trait::async_trait]
impl DirectoryPort for MemoryDatabase {
    async fn get(&self, id: CustomerId) -> Result<Option<Customer>, Error> {
        Ok(self.customers.lock()?.get(id).cloned())
    }

    async fn find_by_phone(&self, phone: Phone) -> Result<Option<Customer>, Error> {
        Ok(self
            .customers
            .lock()?
            .find(|customer| customer.phone == phone)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, Error> {
        Ok(self
            .customers
            .lock()?
            .find(|customer| customer.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, Error> {
        Ok(self.customers.lock()?.by_seq.values().cloned().collect())
    }

    async fn insert(&self, customer: Customer) -> Result<Customer, Error> {
        let mut customers = self.customers.lock()?;

        if customers.find(|c| c.phone == customer.phone).is_some() {
            return Err(Error::DuplicatePhone(customer.phone));
        }
        if customers.find(|c| c.email == customer.email).is_some() {
            return Err(Error::DuplicateEmail(customer.email));
        }

        let seq = customers.next_seq;
        match customers.seq_by_id.entry(customer.id) {
            // Identifiers are never reused
            Entry::Occupied(_) => return Err(IdInUse(customer.id).into()),
            Entry::Vacant(entry) => {
                entry.insert(seq);
            }
        }
        customers.next_seq += 1;
        customers.by_seq.insert(seq, customer.clone());

        Ok(customer)
    }

    async fn remove(&self, id: CustomerId) -> Result<Option<Customer>, Error> {
        let mut customers = self.customers.lock()?;
        let Some(seq) = customers.seq_by_id.remove(&id) else {
            return Ok(None);
        };

        Ok(customers.by_seq.remove(&seq))
    }

    async fn update(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, Error> {
        let mut customers = self.customers.lock()?;
        let customer = customers.get_mut(id).map(|customer| {
            customer.apply(changes);
            customer.clone()
        });

        Ok(customer)
    }

    async fn adjust_points(
        &self,
        id: CustomerId,
        delta: PointsDelta,
    ) -> Result<Option<Customer>, Error> {
        let mut customers = self.customers.lock()?;
        let Some(customer) = customers.get_mut(id) else {
            return Ok(None);
        };

        let Some(points) = delta.apply(customer.points) else {
            return Err(Error::PointsOverflow {
                current_points: customer.points,
                delta,
            });
        };
        customer.points = points;

        Ok(Some(customer.clone()))
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self {
            customers: Arc::new(Mutex::new(Customers::default())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("customer id {0} is already in use")]
pub struct IdInUse(CustomerId);

impl From<IdInUse> for Error {
    fn from(err: IdInUse) -> Self {
        Self::Adapter(Box::new(err))
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewCustomer;
    use rstest::*;
    use speculoos::prelude::*;
    use uuid::Uuid;

    fn customer(phone: u64, email: &str) -> Customer {
        Customer::new(
            CustomerId::new(Uuid::new_v4()),
            NewCustomer {
                name: "John Doe".to_string(),
                phone: Phone(phone),
                email: email.to_string(),
                password: "password".to_string(),
            },
        )
    }

    #[fixture]
    fn database() -> MemoryDatabase {
        MemoryDatabase::default()
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_retrieve(database: MemoryDatabase) {
        let customer = customer(1234567890, "john@doe.io");
        let res = database.insert(customer.clone()).await;
        assert_that!(res).is_ok().is_equal_to(&customer);

        let res = database.get(customer.id).await;
        assert_that!(res)
            .is_ok()
            .is_equal_to(Some(customer.clone()));
        let res = database.find_by_phone(Phone(1234567890)).await;
        assert_that!(res)
            .is_ok()
            .is_equal_to(Some(customer.clone()));
        let res = database.find_by_email("john@doe.io").await;
        assert_that!(res).is_ok().is_equal_to(Some(customer));
        let res = database.find_by_email("jane@doe.io").await;
        assert_that!(res).is_ok().is_none();
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_duplicates(database: MemoryDatabase) {
        database
            .insert(customer(1234567890, "john@doe.io"))
            .await
            .unwrap();

        // Phone is checked before email
        let res = database.insert(customer(1234567890, "john@doe.io")).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::DuplicatePhone(Phone(1234567890))));
        let res = database.insert(customer(2345678901, "john@doe.io")).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::DuplicateEmail(email) if email == "john@doe.io"));

        assert_that!(database.list().await).is_ok().has_length(1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_id_in_use(database: MemoryDatabase) {
        let first = customer(1, "a@doe.io");
        let mut second = customer(2, "b@doe.io");
        second.id = first.id;

        database.insert(first).await.unwrap();
        let res = database.insert(second).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::Adapter(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn test_remove_keeps_order(database: MemoryDatabase) {
        let customers = vec![
            customer(1, "a@doe.io"),
            customer(2, "b@doe.io"),
            customer(3, "c@doe.io"),
        ];
        for customer in &customers {
            database.insert(customer.clone()).await.unwrap();
        }

        let res = database.remove(customers[1].id).await;
        assert_that!(res)
            .is_ok()
            .is_equal_to(Some(customers[1].clone()));

        let res = database.list().await;
        assert_that!(res)
            .is_ok()
            .is_equal_to(vec![customers[0].clone(), customers[2].clone()]);

        // Removing again finds nothing and leaves the rest alone
        let res = database.remove(customers[1].id).await;
        assert_that!(res).is_ok().is_none();
        assert_that!(database.list().await).is_ok().has_length(2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_skips_uniqueness(database: MemoryDatabase) {
        let john = customer(1, "john@doe.io");
        let jane = customer(2, "jane@doe.io");
        database.insert(john.clone()).await.unwrap();
        database.insert(jane.clone()).await.unwrap();

        let res = database
            .update(
                jane.id,
                CustomerChanges {
                    email: Some("john@doe.io".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|customer| customer.email == "john@doe.io");

        // The first match wins on lookup
        let res = database.find_by_email("john@doe.io").await;
        assert_that!(res).is_ok().is_equal_to(Some(john));
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_missing(database: MemoryDatabase) {
        let res = database
            .update(CustomerId::new(Uuid::new_v4()), CustomerChanges::default())
            .await;
        assert_that!(res).is_ok().is_none();
    }

    #[rstest]
    #[tokio::test]
    async fn test_adjust_points(database: MemoryDatabase) {
        let customer = customer(1, "a@doe.io");
        database.insert(customer.clone()).await.unwrap();

        let res = database
            .adjust_points(customer.id, PointsDelta::Credit(100))
            .await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|customer| customer.points == 100);

        // No floor at zero
        let res = database
            .adjust_points(customer.id, PointsDelta::Debit(150))
            .await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|customer| customer.points == -50);

        let res = database
            .adjust_points(CustomerId::new(Uuid::new_v4()), PointsDelta::Credit(1))
            .await;
        assert_that!(res).is_ok().is_none();
    }

    #[rstest]
    #[tokio::test]
    async fn test_adjust_points_overflow(database: MemoryDatabase) {
        let customer = customer(1, "a@doe.io");
        database.insert(customer.clone()).await.unwrap();
        database
            .adjust_points(customer.id, PointsDelta::Credit(i64::MAX))
            .await
            .unwrap();

        let res = database
            .adjust_points(customer.id, PointsDelta::Credit(1))
            .await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::PointsOverflow { .. }));

        // The balance is left untouched
        let res = database.get(customer.id).await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|customer| customer.points == i64::MAX);
    }
}
