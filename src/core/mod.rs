//! Hierarchical header resolution and record expansion
//!
//! Grid → extractor → resolver → classifier → expander → assembler

pub mod assembler;
pub mod classifier;
pub mod expander;
pub mod extractor;
pub mod layout;
pub mod pipeline;
pub mod resolver;

pub use pipeline::{process_batch, SheetOutput, SheetProcessor};
