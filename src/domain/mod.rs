// Domain layer: core models, ports and the pure stages of a matching round.

pub mod model;
pub mod ports;

pub mod services;
