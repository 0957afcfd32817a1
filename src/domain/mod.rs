// Domain layer: booking models and ports. Keeps to std/serde only.

pub mod model;
pub mod ports;
