//! Layered (Sugiyama-style) layout.
//!
//! The engine runs three phases:
//!
//! 1. [`ranking`] assigns every node to a layer with a longest-path walk.
//! 2. [`ordering`] reorders each layer to reduce connection crossings.
//! 3. [`engine`] turns layer and order into coordinates and applies the
//!    requested [`Direction`](crate::config::Direction).

mod engine;
mod ordering;
mod ranking;

pub use engine::Engine;
