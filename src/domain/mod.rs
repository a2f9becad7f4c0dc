use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a [`Customer`]
///
/// Assigned once at creation and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Numeric phone number, unique across all customers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Phone(pub u64);

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A loyalty-program customer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub phone: Phone,
    pub email: String,
    pub name: String,
    /// Stored as given.
    #[serde(skip_serializing)]
    pub password: String,
    /// Current balance of loyalty points
    ///
    /// There is no floor: removing more points than the customer holds makes this negative.
    pub points: i64,
}

impl Customer {
    pub fn new(id: CustomerId, details: NewCustomer) -> Self {
        Self {
            id,
            phone: details.phone,
            email: details.email,
            name: details.name,
            password: details.password,
            points: 0,
        }
    }

    /// Overwrite every field supplied in `changes`
    pub fn apply(&mut self, changes: CustomerChanges) {
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(password) = changes.password {
            self.password = password;
        }
        if let Some(points) = changes.points {
            self.points = points;
        }
    }
}

/// Validated details for a customer that does not exist yet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Phone,
    pub email: String,
    pub password: String,
}

/// Fields to overwrite on an existing customer
///
/// `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub phone: Option<Phone>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub points: Option<i64>,
}

/// Key used to look up a single customer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Criterion {
    Id(CustomerId),
    Phone(Phone),
    Email(String),
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Id(id) => write!(f, "id {id}"),
            Criterion::Phone(phone) => write!(f, "phone {phone}"),
            Criterion::Email(email) => write!(f, "email {email}"),
        }
    }
}

/// Change to a customer's points balance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointsDelta {
    Credit(i64),
    Debit(i64),
}

impl PointsDelta {
    /// New balance after applying this delta, or `None` on overflow
    pub fn apply(&self, points: i64) -> Option<i64> {
        match self {
            PointsDelta::Credit(amount) => points.checked_add(*amount),
            PointsDelta::Debit(amount) => points.checked_sub(*amount),
        }
    }
}

impl fmt::Display for PointsDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointsDelta::Credit(amount) => write!(f, "{amount:+}"),
            // Widened so that debiting i64::MIN still prints its effect
            PointsDelta::Debit(amount) => write!(f, "{:+}", -i128::from(*amount)),
        }
    }
}

/// Values that count as "not supplied" even when present
///
/// Empty strings and zero numbers are treated the same as a missing field, both when creating
/// and when updating a customer. As a consequence an update can never set `points` to 0.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for Phone {
    fn is_blank(&self) -> bool {
        self.0 == 0
    }
}

impl Blank for i64 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

/// Drop blank values
pub fn supplied<T: Blank>(value: Option<T>) -> Option<T> {
    value.filter(|value| !value.is_blank())
}
