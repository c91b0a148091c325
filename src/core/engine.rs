use crate::adapters::clock::SystemClock;
use crate::adapters::memory::InMemoryRepository;
use crate::config::TomlConfig;
use crate::core::snapshot::SnapshotWriter;
use crate::domain::model::{Booking, BookingStatus, Property, User};
use crate::domain::ports::{Clock, Repository};
use crate::domain::services::{BookingService, PropertyService, StatusPolicy, UserService};
use crate::utils::error::Result;
use std::sync::Arc;

/// Front door for callers: runs service operations and writes a full
/// snapshot after every successful mutation.
///
/// A snapshot failure is reported after the mutation has already been applied.
pub struct ReservationEngine {
    users: UserService,
    properties: PropertyService,
    bookings: BookingService,
    snapshots: SnapshotWriter,
}

impl ReservationEngine {
    pub fn new(snapshots: SnapshotWriter, clock: Arc<dyn Clock>, policy: StatusPolicy) -> Self {
        Self::with_repositories(
            Arc::new(InMemoryRepository::<User>::new()),
            Arc::new(InMemoryRepository::<Property>::new()),
            Arc::new(InMemoryRepository::<Booking>::new()),
            clock,
            snapshots,
        )
        .with_status_policy(policy)
    }

    pub fn with_repositories(
        users: Arc<dyn Repository<User>>,
        properties: Arc<dyn Repository<Property>>,
        bookings: Arc<dyn Repository<Booking>>,
        clock: Arc<dyn Clock>,
        snapshots: SnapshotWriter,
    ) -> Self {
        Self {
            users: UserService::new(users.clone()),
            properties: PropertyService::new(properties.clone()),
            bookings: BookingService::new(bookings, users, properties, clock),
            snapshots,
        }
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let snapshots = SnapshotWriter::from_config(config)?;
        tracing::debug!(
            "Engine configured: snapshots {}, status policy {:?}",
            if snapshots.is_enabled() { "on" } else { "off" },
            config.status_policy()
        );
        Ok(Self::new(snapshots, Arc::new(SystemClock), config.status_policy()))
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.bookings = self.bookings.with_status_policy(policy);
        self
    }

    pub fn user_service(&self) -> &UserService {
        &self.users
    }

    pub fn property_service(&self) -> &PropertyService {
        &self.properties
    }

    pub fn booking_service(&self) -> &BookingService {
        &self.bookings
    }

    pub fn save_snapshot(&self) -> Result<()> {
        self.snapshots.write(
            &self.users.list_users(),
            &self.properties.list_properties(),
            &self.bookings.list_bookings(),
        )
    }

    fn persisted<T>(&self, value: T) -> Result<T> {
        self.save_snapshot()?;
        Ok(value)
    }

    pub fn create_user(&self, user: User) -> Result<User> {
        let user = self.users.create_user(user)?;
        self.persisted(user)
    }

    pub fn get_user(&self, user_id: &str) -> Result<User> {
        self.users.get_user(user_id)
    }

    pub fn update_user(&self, user: User) -> Result<User> {
        let user = self.users.update_user(user)?;
        self.persisted(user)
    }

    pub fn delete_user(&self, user_id: &str) -> Result<()> {
        self.users.delete_user(user_id)?;
        self.persisted(())
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.list_users()
    }

    pub fn create_property(&self, property: Property) -> Result<Property> {
        let property = self.properties.create_property(property)?;
        self.persisted(property)
    }

    pub fn get_property(&self, property_id: &str) -> Result<Property> {
        self.properties.get_property(property_id)
    }

    pub fn update_property(&self, property: Property) -> Result<Property> {
        let property = self.properties.update_property(property)?;
        self.persisted(property)
    }

    pub fn delete_property(&self, property_id: &str) -> Result<()> {
        self.properties.delete_property(property_id)?;
        self.persisted(())
    }

    pub fn list_properties(&self) -> Vec<Property> {
        self.properties.list_properties()
    }

    pub fn create_booking(&self, booking: Booking) -> Result<Booking> {
        let booking = self.bookings.create_booking(booking)?;
        self.persisted(booking)
    }

    pub fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        self.bookings.get_booking(booking_id)
    }

    pub fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking> {
        let booking = self.bookings.update_booking_status(booking_id, status)?;
        self.persisted(booking)
    }

    pub fn delete_booking(&self, booking_id: &str) -> Result<()> {
        self.bookings.delete_booking(booking_id)?;
        self.persisted(())
    }

    pub fn list_bookings(&self) -> Vec<Booking> {
        self.bookings.list_bookings()
    }
}
