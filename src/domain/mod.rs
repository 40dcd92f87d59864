// Domain layer: form data model and service ports. No HTTP or CLI types here.

pub mod model;
pub mod ports;
