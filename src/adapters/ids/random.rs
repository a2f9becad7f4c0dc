use crate::{
    domain::CustomerId,
    ports::ids::{Error, IdPort},
};
use uuid::Uuid;

/// Random (v4) UUIDs
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdPort for UuidGenerator {
    fn next_id(&self) -> Result<CustomerId, Error> {
        Ok(CustomerId::new(Uuid::new_v4()))
    }
}
