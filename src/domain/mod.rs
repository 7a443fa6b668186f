// Domain layer: core models and ports (interfaces). No storage or CLI code here.

pub mod model;
pub mod ports;
