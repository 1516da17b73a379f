//! Turns raw generated text into validated domain structures.
//!
//! Both parsers are pure functions with no I/O.

mod graph;
mod questions;

pub use graph::{parse_graph, GraphParseError};
pub use questions::{classify_line, parse_questions};
