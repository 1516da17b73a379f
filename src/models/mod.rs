//! Domain models for the idea pipeline.
//!
//! # Core Concepts
//!
//! - [`Idea`]: Raw idea text with its generated questions and recorded answers.
//!   Progresses through [`PipelineStage`]s as artifacts are produced.
//! - [`Graph`]: Nodes and edges describing how the idea breaks down. One per
//!   idea, overwritten on every rebuild or edit.
//! - [`Plan`]: Markdown execution plan. Generated once, then served from the
//!   store.

mod graph;
mod idea;
mod plan;

pub use graph::*;
pub use idea::*;
pub use plan::*;
