use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{BookingError, Result};

/// An object with its own identity, stored through a `Repository`.
pub trait Entity: Clone + Send + Sync {
    /// Lowercase kind name, also used as the XML element tag.
    const KIND: &'static str;

    /// The identifier used for indexing. Empty until the owning service assigns one.
    fn entity_id(&self) -> &str;

    fn set_entity_id(&mut self, id: String);
}

/// Canonical nested-mapping representation consumed by the serializers.
pub trait Projection {
    fn kind(&self) -> &'static str;

    fn project(&self) -> Result<serde_json::Value>;
}

impl<T: Entity + Serialize> Projection for T {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn project(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| {
            BookingError::serialization(format!("cannot project {}: {}", T::KIND, e))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.street, self.city, self.postal_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Address,
    /// Bookings made by this user, kept in sync by `BookingService`.
    #[serde(skip)]
    pub booking_ids: Vec<String>,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            user_id: String::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            address,
            booking_ids: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn entity_id(&self) -> &str {
        &self.user_id
    }

    fn set_entity_id(&mut self, id: String) {
        self.user_id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub property_id: String,
    pub name: String,
    pub address: Address,
    pub price_per_night: f64,
}

impl Property {
    pub fn new(name: impl Into<String>, address: Address, price_per_night: f64) -> Self {
        Self {
            property_id: String::new(),
            name: name.into(),
            address,
            price_per_night,
        }
    }
}

impl Entity for Property {
    const KIND: &'static str = "property";

    fn entity_id(&self) -> &str {
        &self.property_id
    }

    fn set_entity_id(&mut self, id: String) {
        self.property_id = id;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Whether `self -> next` is part of the booking lifecycle.
    /// Re-applying the current status is always allowed.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        if *self == next {
            return true;
        }
        !self.is_terminal()
            && matches!(
                (self, next),
                (Pending, Confirmed) | (Confirmed, Completed) | (_, Cancelled)
            )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(BookingError::InvalidEntity {
                message: format!("unknown booking status '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub user_id: String,
    pub property_id: String,
    pub check_in_date: NaiveDateTime,
    pub check_out_date: NaiveDateTime,
    pub status: BookingStatus,
    pub total_price: f64,
}

impl Booking {
    /// A not-yet-persisted booking of `property` by `user`.
    pub fn new(
        user: &User,
        property: &Property,
        check_in_date: NaiveDateTime,
        check_out_date: NaiveDateTime,
    ) -> Self {
        Self {
            booking_id: String::new(),
            user_id: user.user_id.clone(),
            property_id: property.property_id.clone(),
            check_in_date,
            check_out_date,
            status: BookingStatus::Pending,
            total_price: 0.0,
        }
    }

    pub fn update_status(&mut self, status: BookingStatus) {
        self.status = status;
    }

    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }
}

impl Entity for Booking {
    const KIND: &'static str = "booking";

    fn entity_id(&self) -> &str {
        &self.booking_id
    }

    fn set_entity_id(&mut self, id: String) {
        self.booking_id = id;
    }
}
