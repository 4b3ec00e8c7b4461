//! Small helpers shared by the md3-rs crates.

pub mod debug;
