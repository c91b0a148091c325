use crate::domain::model::{Entity, User};
use crate::domain::ports::Repository;
use crate::domain::services::IdSequence;
use crate::utils::error::{BookingError, Result};
use std::sync::Arc;

pub struct UserService {
    repository: Arc<dyn Repository<User>>,
    ids: IdSequence,
}

impl UserService {
    pub fn new(repository: Arc<dyn Repository<User>>) -> Self {
        let ids = IdSequence::starting_after("U", repository.len());
        Self { repository, ids }
    }

    pub fn create_user(&self, mut user: User) -> Result<User> {
        user.set_entity_id(self.ids.next_id());
        self.repository
            .create(user.clone())
            .map_err(|e| BookingError::wrap("create user", e))?;

        tracing::info!("Created user {} ({})", user.user_id, user.full_name());
        Ok(user)
    }

    pub fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository
            .read(user_id)
            .ok_or_else(|| BookingError::UserNotFound {
                id: user_id.to_string(),
            })
    }

    /// Booking references are owned by the booking service and carried over
    /// from the stored user.
    pub fn update_user(&self, mut user: User) -> Result<User> {
        let stored = self.get_user(&user.user_id)?;
        user.booking_ids = stored.booking_ids;
        self.repository
            .update(user.clone())
            .map_err(|e| BookingError::wrap("update user", e))?;

        tracing::info!("Updated user {}", user.user_id);
        Ok(user)
    }

    /// Bookings that reference the user are left untouched.
    pub fn delete_user(&self, user_id: &str) -> Result<()> {
        let user = self.get_user(user_id)?;
        if !user.booking_ids.is_empty() {
            tracing::debug!(
                "Deleting user {} leaves {} booking(s) without an owner",
                user_id,
                user.booking_ids.len()
            );
        }

        self.repository
            .delete(user_id)
            .map_err(|e| BookingError::wrap("delete user", e))?;

        tracing::info!("Deleted user {}", user_id);
        Ok(())
    }

    pub fn list_users(&self) -> Vec<User> {
        self.repository.list_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryRepository;
    use crate::domain::model::Address;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryRepository::<User>::new()))
    }

    fn user(first: &str) -> User {
        User::new(
            first,
            "Tester",
            format!("{}@example.com", first.to_lowercase()),
            Address::new("123 Main St", "New York", "10001"),
        )
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let service = service();
        let ids: Vec<String> = ["Alice", "Bob", "Carol"]
            .iter()
            .map(|name| service.create_user(user(name)).unwrap().user_id)
            .collect();

        assert_eq!(ids, vec!["U1", "U2", "U3"]);
        let listed: Vec<String> = service.list_users().into_iter().map(|u| u.user_id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let service = service();
        service.create_user(user("Alice")).unwrap();
        let bob = service.create_user(user("Bob")).unwrap();
        service.delete_user(&bob.user_id).unwrap();

        let carol = service.create_user(user("Carol")).unwrap();
        assert_eq!(carol.user_id, "U3");
    }

    #[test]
    fn test_get_missing_user() {
        let service = service();
        let err = service.get_user("U42").unwrap_err();
        assert!(matches!(err, BookingError::UserNotFound { ref id } if id == "U42"));
    }

    #[test]
    fn test_update_replaces_user() {
        let service = service();
        let mut alice = service.create_user(user("Alice")).unwrap();
        alice.email = "alice@new.example.com".to_string();

        service.update_user(alice.clone()).unwrap();
        assert_eq!(service.get_user("U1").unwrap().email, "alice@new.example.com");
    }

    #[test]
    fn test_update_keeps_booking_references() {
        let service = service();
        let mut alice = user("Alice");
        alice.user_id = "U1".to_string();
        alice.booking_ids = vec!["B1".to_string()];
        service.repository.create(alice).unwrap();

        let edited = User {
            user_id: "U1".to_string(),
            ..user("Alicia")
        };
        let updated = service.update_user(edited).unwrap();

        assert_eq!(updated.booking_ids, vec!["B1".to_string()]);
        let stored = service.get_user("U1").unwrap();
        assert_eq!(stored.first_name, "Alicia");
        assert_eq!(stored.booking_ids, vec!["B1".to_string()]);
    }

    #[test]
    fn test_update_and_delete_missing_user_propagate_not_found() {
        let service = service();
        let mut ghost = user("Ghost");
        ghost.user_id = "U7".to_string();

        assert!(matches!(
            service.update_user(ghost).unwrap_err(),
            BookingError::UserNotFound { .. }
        ));
        assert!(matches!(
            service.delete_user("U7").unwrap_err(),
            BookingError::UserNotFound { .. }
        ));
    }

    #[test]
    fn test_deleted_user_is_gone() {
        let service = service();
        let alice = service.create_user(user("Alice")).unwrap();
        service.delete_user(&alice.user_id).unwrap();

        assert!(service.get_user(&alice.user_id).unwrap_err().is_not_found());
        assert!(service.list_users().is_empty());
    }
}
