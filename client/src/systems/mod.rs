//! Client-side game systems
//!
//! Organized into submodules for maintainability.

mod aim;
mod animation;
mod player;
mod world;

// Re-export everything for easy access from main.rs
pub use aim::*;
pub use animation::*;
pub use player::*;
pub use world::*;
