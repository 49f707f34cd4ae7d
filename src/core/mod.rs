pub mod engine;
pub mod headers;
pub mod manifest;
pub mod registry;
pub mod resolver;

pub use crate::domain::model::{Module, Resolution};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SourceTree, Storage};
pub use crate::utils::error::Result;
