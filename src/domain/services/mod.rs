pub mod bookings;
pub mod properties;
pub mod users;

pub use bookings::{BookingService, StatusPolicy};
pub use properties::PropertyService;
pub use users::UserService;

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic `<prefix><n>` identifier source. Numbers are never reused,
/// even after the entity holding them is deleted.
#[derive(Debug)]
pub struct IdSequence {
    prefix: &'static str,
    last: AtomicU64,
}

impl IdSequence {
    /// A sequence whose first id is `<prefix><issued + 1>`.
    pub fn starting_after(prefix: &'static str, issued: usize) -> Self {
        Self {
            prefix,
            last: AtomicU64::new(issued as u64),
        }
    }

    pub fn next_id(&self) -> String {
        let n = self.last.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}{}", self.prefix, n)
    }
}
