// Domain layer: entities, options and ports shared by the engine and its adapters.

pub mod model;
pub mod options;
pub mod ports;
