//! Force-directed layout.
//!
//! [`Engine`] runs a damped spring/repulsion simulation. Repulsion between
//! many bodies is approximated with the Barnes-Hut [`QuadTree`].

mod engine;
mod jitter;
mod quadtree;
mod repulsion;

pub use engine::Engine;
pub use jitter::{Jitter, RandomJitter};
pub use quadtree::{QuadTree, QuadTreeBuilder};
pub use repulsion::{Body, Repulsion};
