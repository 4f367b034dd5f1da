// Domain layer: value types, ports (interfaces) and the pure greeting
// services. No I/O happens here.

pub mod model;
pub mod ports;
pub mod services;
