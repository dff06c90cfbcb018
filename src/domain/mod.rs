// Domain layer: compose models and the traits the resolver consumes.

pub mod model;
pub mod ports;
