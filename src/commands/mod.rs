//! Command implementations for bedstack.

pub mod clean_names;
pub mod stack;

pub use clean_names::{CleanNamesCommand, CleanNamesStats};
pub use stack::{StackCommand, StackStats};
