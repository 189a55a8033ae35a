// Domain layer: lesson models and ports (interfaces).

pub mod model;
pub mod ports;
