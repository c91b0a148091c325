use crate::domain::model::Entity;
use crate::domain::ports::Repository;
use crate::utils::error::{BookingError, Result};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-lifetime store keeping entities in insertion order.
#[derive(Debug)]
pub struct InMemoryRepository<T: Entity> {
    storage: RwLock<Vec<T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(Vec::new()),
        }
    }

    fn entries(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.storage.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn entries_mut(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.storage.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn id_of(entity: &T) -> Result<String> {
        let id = entity.entity_id();
        if id.is_empty() {
            return Err(BookingError::InvalidEntity {
                message: format!("{} has no {}_id", T::KIND, T::KIND),
            });
        }
        Ok(id.to_string())
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn create(&self, entity: T) -> Result<()> {
        let id = Self::id_of(&entity)?;
        let mut entries = self.entries_mut();
        if entries.iter().any(|e| e.entity_id() == id) {
            return Err(BookingError::DuplicateId { id });
        }

        tracing::debug!("Inserting {} {}", T::KIND, id);
        entries.push(entity);
        Ok(())
    }

    fn read(&self, id: &str) -> Option<T> {
        self.entries().iter().find(|e| e.entity_id() == id).cloned()
    }

    fn update(&self, entity: T) -> Result<()> {
        let id = Self::id_of(&entity)?;
        let mut entries = self.entries_mut();
        match entries.iter_mut().find(|e| e.entity_id() == id) {
            Some(slot) => {
                *slot = entity;
                Ok(())
            }
            None => Err(BookingError::NotFound { id }),
        }
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut entries = self.entries_mut();
        match entries.iter().position(|e| e.entity_id() == id) {
            Some(index) => {
                entries.remove(index);
                Ok(())
            }
            None => Err(BookingError::NotFound { id: id.to_string() }),
        }
    }

    fn list_all(&self) -> Vec<T> {
        self.entries().clone()
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}
