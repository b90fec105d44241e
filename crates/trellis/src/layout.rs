//! Layout computation.
//!
//! The [`engines`] module holds one engine per algorithm behind the
//! [`engines::LayoutEngine`] trait. Engines produce a raw
//! [`engines::Placement`]; [`LayoutResult`] normalizes it into the shape
//! returned to callers.

pub mod engines;
mod result;

pub use result::{LayoutMetrics, LayoutResult};
