pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod report;

pub use pipeline::{BuildOptions, DocModel, build};
