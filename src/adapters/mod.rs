// Adapters layer: concrete implementations of the domain ports
// (storage, snapshot file formats, clocks).

pub mod clock;
pub mod json;
pub mod memory;
pub mod xml;
