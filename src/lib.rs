//! Boolean **difference** clipping of polygon soups, as needed when importing
//! solid CAD geometry (IFC-style "swept solid minus half-space" constructs)
//! into renderable polygon meshes.
//!
//! The entry point is [`process_boolean`]: it inspects a [`BooleanNode`],
//! materializes the first operand into a [`PolygonSoup`] (recursing through
//! nested Boolean results), then subtracts the second operand — an infinite
//! [`HalfSpace`], a [`PolygonalBoundedHalfSpace`] whose effect is restricted
//! to a 2D profile footprint, or an extruded solid handed to the caller's
//! opening generator.
//!
//! Failure handling is local and best-effort: malformed operands and
//! numerically inconsistent loops are reported through the [`log`] facade and
//! the affected loop is left unclipped or dropped, never propagated as an
//! error. The engine only subtracts; union and intersection are out of scope,
//! as is triangulation of the resulting loops.
//!
//! # Features
//! - **f64** (default): use f64 as Real
//! - **f32**: use f32 as Real, conflicts with f64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod boolean;
pub mod boundary;
pub mod bounded;
pub mod errors;
pub mod float_types;
pub mod geometry;
pub mod halfspace;
pub mod soup;
pub mod unbounded;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use boolean::{
    BooleanNode, BooleanOperator, ClipOptions, ConversionContext, EntityRef,
    MarchOverflowPolicy, Operand, process_boolean,
};
pub use halfspace::{HalfSpace, PolygonalBoundedHalfSpace};
pub use soup::PolygonSoup;
