use crate::domain::model::{Booking, BookingStatus, Entity, Property, User};
use crate::domain::ports::{Clock, Repository};
use crate::domain::services::IdSequence;
use crate::utils::error::{BookingError, Result};
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which status changes `update_booking_status` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Any status may replace any other.
    #[default]
    Unrestricted,
    /// Only lifecycle moves: pending -> confirmed|cancelled, confirmed -> completed|cancelled.
    Strict,
}

pub struct BookingService {
    bookings: Arc<dyn Repository<Booking>>,
    users: Arc<dyn Repository<User>>,
    properties: Arc<dyn Repository<Property>>,
    clock: Arc<dyn Clock>,
    policy: StatusPolicy,
    ids: IdSequence,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn Repository<Booking>>,
        users: Arc<dyn Repository<User>>,
        properties: Arc<dyn Repository<Property>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ids = IdSequence::starting_after("B", bookings.len());
        Self {
            bookings,
            users,
            properties,
            clock,
            policy: StatusPolicy::default(),
            ids,
        }
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Nightly price times whole nights, billed for at least one night,
    /// rounded half-to-even to cents.
    pub fn calculate_price(
        price_per_night: f64,
        check_in: NaiveDateTime,
        check_out: NaiveDateTime,
    ) -> f64 {
        let nights = (check_out - check_in).num_days().max(1);
        round_cents(price_per_night * nights as f64)
    }

    fn validate_dates(&self, booking: &Booking) -> Result<()> {
        if booking.check_in_date >= booking.check_out_date {
            return Err(BookingError::invalid_date(
                "Check-out date must be after check-in date.",
            ));
        }
        if booking.check_in_date < self.clock.now() {
            return Err(BookingError::invalid_date(
                "Check-in date cannot be in the past.",
            ));
        }
        Ok(())
    }

    pub fn create_booking(&self, mut booking: Booking) -> Result<Booking> {
        self.validate_dates(&booking)?;

        let mut owner = self
            .users
            .read(&booking.user_id)
            .ok_or_else(|| BookingError::UserNotFound {
                id: booking.user_id.clone(),
            })?;
        let property = self
            .properties
            .read(&booking.property_id)
            .ok_or_else(|| BookingError::PropertyNotFound {
                id: booking.property_id.clone(),
            })?;

        booking.set_entity_id(self.ids.next_id());
        booking.total_price = Self::calculate_price(
            property.price_per_night,
            booking.check_in_date,
            booking.check_out_date,
        );
        booking.status = BookingStatus::Pending;

        self.bookings
            .create(booking.clone())
            .map_err(|e| BookingError::wrap("create booking", e))?;

        owner.booking_ids.push(booking.booking_id.clone());
        self.users
            .update(owner)
            .map_err(|e| BookingError::wrap("create booking", e))?;

        tracing::info!(
            "Created booking {} for user {} at property {}: {} night(s), total {:.2}",
            booking.booking_id,
            booking.user_id,
            booking.property_id,
            booking.nights().max(1),
            booking.total_price
        );
        Ok(booking)
    }

    pub fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        self.bookings
            .read(booking_id)
            .ok_or_else(|| BookingError::BookingNotFound {
                id: booking_id.to_string(),
            })
    }

    pub fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking> {
        let mut booking = self.get_booking(booking_id)?;

        if self.policy == StatusPolicy::Strict && !booking.status.can_transition_to(status) {
            return Err(BookingError::InvalidStatusTransition {
                from: booking.status.to_string(),
                to: status.to_string(),
            });
        }

        let previous = booking.status;
        booking.update_status(status);
        self.bookings
            .update(booking.clone())
            .map_err(|e| BookingError::wrap("update booking status", e))?;

        tracing::info!("Booking {} status {} -> {}", booking_id, previous, status);
        Ok(booking)
    }

    pub fn delete_booking(&self, booking_id: &str) -> Result<()> {
        let booking = self.get_booking(booking_id)?;
        self.bookings
            .delete(booking_id)
            .map_err(|e| BookingError::wrap("delete booking", e))?;

        // The owner may already be gone; dangling references are tolerated.
        if let Some(mut owner) = self.users.read(&booking.user_id) {
            owner.booking_ids.retain(|id| id != booking_id);
            self.users
                .update(owner)
                .map_err(|e| BookingError::wrap("delete booking", e))?;
        }

        tracing::info!("Deleted booking {}", booking_id);
        Ok(())
    }

    pub fn list_bookings(&self) -> Vec<Booking> {
        self.bookings.list_all()
    }

    pub fn list_bookings_for_user(&self, user_id: &str) -> Vec<Booking> {
        self.bookings
            .list_all()
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .collect()
    }
}

/// Half-to-even on the decimal value of `amount`, so `10.125` bills as `10.12`.
fn round_cents(amount: f64) -> f64 {
    Decimal::from_f64_retain(amount)
        .map(|exact| exact.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::InMemoryRepository;
    use crate::domain::model::Address;
    use chrono::{Duration, NaiveDate};

    struct Fixture {
        service: BookingService,
        users: Arc<InMemoryRepository<User>>,
        bookings: Arc<InMemoryRepository<Booking>>,
        user: User,
        property: Property,
        now: NaiveDateTime,
    }

    fn fixture(policy: StatusPolicy) -> Fixture {
        let now = NaiveDate::from_ymd_opt(2030, 1, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let address = Address::new("123 Main St", "New York", "10001");

        let users = Arc::new(InMemoryRepository::<User>::new());
        let properties = Arc::new(InMemoryRepository::<Property>::new());
        let bookings = Arc::new(InMemoryRepository::<Booking>::new());

        let mut user = User::new("Alice", "Smith", "alice@example.com", address.clone());
        user.user_id = "U1".to_string();
        users.create(user.clone()).unwrap();

        let mut property = Property::new("Cozy Apartment", address, 150.0);
        property.property_id = "P1".to_string();
        properties.create(property.clone()).unwrap();

        let service = BookingService::new(
            bookings.clone(),
            users.clone(),
            properties,
            Arc::new(FixedClock::new(now)),
        )
        .with_status_policy(policy);

        Fixture {
            service,
            users,
            bookings,
            user,
            property,
            now,
        }
    }

    #[test]
    fn test_price_floor_and_rounding() {
        let start = NaiveDate::from_ymd_opt(2030, 3, 1)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();

        assert_eq!(
            BookingService::calculate_price(150.0, start, start + Duration::days(3)),
            450.0
        );
        assert_eq!(
            BookingService::calculate_price(150.0, start, start + Duration::hours(5)),
            150.0
        );
        // 2 days 23 hours is two whole nights
        assert_eq!(
            BookingService::calculate_price(99.999, start, start + Duration::hours(71)),
            200.0
        );
        assert_eq!(
            BookingService::calculate_price(33.333, start, start + Duration::days(1)),
            33.33
        );
        // ties go to the even cent
        assert_eq!(
            BookingService::calculate_price(10.125, start, start + Duration::days(1)),
            10.12
        );
        assert_eq!(
            BookingService::calculate_price(10.375, start, start + Duration::days(1)),
            10.38
        );
        assert_eq!(
            BookingService::calculate_price(2.675, start, start + Duration::days(1)),
            2.67
        );
    }

    #[test]
    fn test_create_booking_populates_fields() {
        let f = fixture(StatusPolicy::Unrestricted);
        let check_in = f.now + Duration::days(1);
        let mut booking = Booking::new(
            &f.user,
            &f.property,
            check_in,
            check_in + Duration::days(3),
        );
        booking.status = BookingStatus::Completed;

        let created = f.service.create_booking(booking).unwrap();
        assert_eq!(created.booking_id, "B1");
        assert_eq!(created.total_price, 450.0);
        assert_eq!(created.status, BookingStatus::Pending);
        assert_eq!(f.users.read("U1").unwrap().booking_ids, vec!["B1".to_string()]);
    }

    #[test]
    fn test_check_out_not_after_check_in_is_rejected() {
        let f = fixture(StatusPolicy::Unrestricted);
        let day = f.now + Duration::days(2);

        for check_out in [day, day - Duration::days(1)] {
            let err = f
                .service
                .create_booking(Booking::new(&f.user, &f.property, day, check_out))
                .unwrap_err();
            assert!(matches!(err, BookingError::InvalidDate { .. }));
        }
        assert!(f.bookings.is_empty());
        assert!(f.users.read("U1").unwrap().booking_ids.is_empty());
    }

    #[test]
    fn test_check_in_in_the_past_is_rejected() {
        let f = fixture(StatusPolicy::Unrestricted);
        let check_in = f.now - Duration::minutes(1);
        let err = f
            .service
            .create_booking(Booking::new(
                &f.user,
                &f.property,
                check_in,
                check_in + Duration::days(2),
            ))
            .unwrap_err();

        assert!(matches!(err, BookingError::InvalidDate { .. }));
        assert!(f.service.list_bookings().is_empty());
    }

    #[test]
    fn test_check_in_exactly_now_is_accepted() {
        let f = fixture(StatusPolicy::Unrestricted);
        let booking = Booking::new(&f.user, &f.property, f.now, f.now + Duration::days(1));
        assert!(f.service.create_booking(booking).is_ok());
    }

    #[test]
    fn test_unknown_references_are_rejected() {
        let f = fixture(StatusPolicy::Unrestricted);
        let check_in = f.now + Duration::days(1);

        let mut stranger = f.user.clone();
        stranger.user_id = "U99".to_string();
        let err = f
            .service
            .create_booking(Booking::new(
                &stranger,
                &f.property,
                check_in,
                check_in + Duration::days(1),
            ))
            .unwrap_err();
        assert!(matches!(err, BookingError::UserNotFound { .. }));

        let mut unlisted = f.property.clone();
        unlisted.property_id = "P99".to_string();
        let err = f
            .service
            .create_booking(Booking::new(
                &f.user,
                &unlisted,
                check_in,
                check_in + Duration::days(1),
            ))
            .unwrap_err();
        assert!(matches!(err, BookingError::PropertyNotFound { .. }));
        assert!(f.bookings.is_empty());
    }

    #[test]
    fn test_unrestricted_policy_allows_any_transition() {
        let f = fixture(StatusPolicy::Unrestricted);
        let check_in = f.now + Duration::days(1);
        let created = f
            .service
            .create_booking(Booking::new(
                &f.user,
                &f.property,
                check_in,
                check_in + Duration::days(1),
            ))
            .unwrap();

        f.service
            .update_booking_status(&created.booking_id, BookingStatus::Cancelled)
            .unwrap();
        let reopened = f
            .service
            .update_booking_status(&created.booking_id, BookingStatus::Pending)
            .unwrap();
        assert_eq!(reopened.status, BookingStatus::Pending);
        assert_eq!(f.service.get_booking("B1").unwrap().status, BookingStatus::Pending);
    }

    #[test]
    fn test_strict_policy_guards_lifecycle() {
        let f = fixture(StatusPolicy::Strict);
        let check_in = f.now + Duration::days(1);
        let created = f
            .service
            .create_booking(Booking::new(
                &f.user,
                &f.property,
                check_in,
                check_in + Duration::days(1),
            ))
            .unwrap();
        let id = created.booking_id.as_str();

        f.service.update_booking_status(id, BookingStatus::Confirmed).unwrap();
        f.service.update_booking_status(id, BookingStatus::Cancelled).unwrap();

        let err = f
            .service
            .update_booking_status(id, BookingStatus::Confirmed)
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidStatusTransition { .. }));
        assert_eq!(f.service.get_booking(id).unwrap().status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_delete_booking_detaches_from_user() {
        let f = fixture(StatusPolicy::Unrestricted);
        let check_in = f.now + Duration::days(1);
        let created = f
            .service
            .create_booking(Booking::new(
                &f.user,
                &f.property,
                check_in,
                check_in + Duration::days(1),
            ))
            .unwrap();

        f.service.delete_booking(&created.booking_id).unwrap();
        assert!(f.users.read("U1").unwrap().booking_ids.is_empty());
        assert!(matches!(
            f.service.get_booking(&created.booking_id).unwrap_err(),
            BookingError::BookingNotFound { .. }
        ));
        assert!(matches!(
            f.service.delete_booking(&created.booking_id).unwrap_err(),
            BookingError::BookingNotFound { .. }
        ));
    }

    #[test]
    fn test_booking_survives_owner_deletion() {
        let f = fixture(StatusPolicy::Unrestricted);
        let check_in = f.now + Duration::days(1);
        let created = f
            .service
            .create_booking(Booking::new(
                &f.user,
                &f.property,
                check_in,
                check_in + Duration::days(1),
            ))
            .unwrap();

        f.users.delete("U1").unwrap();
        assert_eq!(f.service.list_bookings_for_user("U1").len(), 1);
        f.service.delete_booking(&created.booking_id).unwrap();
        assert!(f.service.list_bookings().is_empty());
    }
}
