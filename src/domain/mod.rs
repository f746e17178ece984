// Domain layer: core models, ports (interfaces) and the pure line services.

pub mod model;
pub mod ports;

pub mod services;
