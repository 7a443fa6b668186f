pub mod classifier;
pub mod etl;
pub mod pipeline;
pub mod regex_builder;

pub use crate::domain::model::{Rule, TransformResult};
pub use crate::domain::ports::{ConfigProvider, DomainStore, Pipeline};
pub use crate::utils::error::Result;
