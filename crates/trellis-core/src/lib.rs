//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Trellis layout
//! engine and its front ends. It includes:
//!
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Identifiers**: Node and connection identifiers ([`identifier`] module)
//! - **Model**: The nodes and connections a layout is computed for ([`model`] module)

pub mod geometry;
pub mod identifier;
pub mod model;
