pub mod engine;
pub mod snapshot;

pub use crate::domain::model::{Address, Booking, BookingStatus, Entity, Projection, Property, User};
pub use crate::domain::ports::{Clock, Repository, Serializer};
pub use crate::utils::error::Result;
