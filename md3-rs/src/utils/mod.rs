//! Shared utilities for the md3-rs CLI

pub mod format;
pub mod table;
pub mod tree;

pub use format::*;
pub use table::*;
pub use tree::*;
