//! Command implementations

pub mod anim;
pub mod model;
pub mod play;
pub mod skin;
