use crate::domain::model::Projection;
use crate::domain::ports::Serializer;
use crate::utils::error::{BookingError, Result};
use serde_json::Value;

/// Snapshot as an indented JSON array, one object per entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn format(&self) -> &'static str {
        "json"
    }

    fn encode<T: Projection>(&self, data: &[T]) -> Result<String> {
        let projections = data
            .iter()
            .map(Projection::project)
            .collect::<Result<Vec<Value>>>()?;

        serde_json::to_string_pretty(&projections)
            .map_err(|e| BookingError::serialization(format!("JSON encoding failed: {}", e)))
    }

    fn decode(&self, content: &str) -> Result<Vec<Value>> {
        serde_json::from_str(content)
            .map_err(|e| BookingError::serialization(format!("malformed JSON snapshot: {}", e)))
    }
}
