// Domain layer: entities, ports (interfaces) and the services enforcing booking rules.
// Concrete storage, serialization and clocks live under adapters.

pub mod model;
pub mod ports;

pub mod services;
