//! Turn a short idea into clarifying questions, a dependency graph and a
//! markdown implementation plan.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod heuristic;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod store;

pub use config::Config;
pub use error::PipelineError;
pub use pipeline::Pipeline;
