pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    clock::{FixedClock, SystemClock},
    json::JsonSerializer,
    memory::InMemoryRepository,
    xml::XmlSerializer,
};
pub use config::TomlConfig;
pub use core::{
    engine::ReservationEngine,
    snapshot::{SnapshotFormat, SnapshotTarget, SnapshotWriter},
};
pub use domain::model::{Address, Booking, BookingStatus, Entity, Projection, Property, User};
pub use domain::ports::{Clock, Repository, Serializer};
pub use domain::services::{BookingService, PropertyService, StatusPolicy, UserService};
pub use utils::error::{BookingError, Result};
