use crate::domain::model::{Entity, Property};
use crate::domain::ports::Repository;
use crate::domain::services::IdSequence;
use crate::utils::error::{BookingError, Result};
use std::sync::Arc;

/// Catalog of bookable properties.
pub struct PropertyService {
    repository: Arc<dyn Repository<Property>>,
    ids: IdSequence,
}

impl PropertyService {
    pub fn new(repository: Arc<dyn Repository<Property>>) -> Self {
        let ids = IdSequence::starting_after("P", repository.len());
        Self { repository, ids }
    }

    fn validate_price(property: &Property) -> Result<()> {
        let price = property.price_per_night;
        if !price.is_finite() || price < 0.0 {
            return Err(BookingError::InvalidPrice { price });
        }
        Ok(())
    }

    pub fn create_property(&self, mut property: Property) -> Result<Property> {
        Self::validate_price(&property)?;

        property.set_entity_id(self.ids.next_id());
        self.repository
            .create(property.clone())
            .map_err(|e| BookingError::wrap("create property", e))?;

        tracing::info!(
            "Created property {} '{}' at {:.2}/night",
            property.property_id,
            property.name,
            property.price_per_night
        );
        Ok(property)
    }

    pub fn get_property(&self, property_id: &str) -> Result<Property> {
        self.repository
            .read(property_id)
            .ok_or_else(|| BookingError::PropertyNotFound {
                id: property_id.to_string(),
            })
    }

    pub fn update_property(&self, property: Property) -> Result<Property> {
        Self::validate_price(&property)?;
        self.get_property(&property.property_id)?;
        self.repository
            .update(property.clone())
            .map_err(|e| BookingError::wrap("update property", e))?;

        tracing::info!("Updated property {}", property.property_id);
        Ok(property)
    }

    pub fn delete_property(&self, property_id: &str) -> Result<()> {
        self.get_property(property_id)?;
        self.repository
            .delete(property_id)
            .map_err(|e| BookingError::wrap("delete property", e))?;

        tracing::info!("Deleted property {}", property_id);
        Ok(())
    }

    pub fn list_properties(&self) -> Vec<Property> {
        self.repository.list_all()
    }
}
