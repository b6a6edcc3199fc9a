//! Focus - a first-person puzzle game about keeping a target in view
//!
//! The gameplay lives in the member crates; this crate adds the
//! configuration and the systems the binary runs.

pub mod config;
pub mod systems;
