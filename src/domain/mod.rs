// Domain layer: core models, tag dictionary and ports (interfaces).

pub mod model;
pub mod ports;
pub mod tags;
