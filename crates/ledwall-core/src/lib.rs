#![forbid(unsafe_code)]

//! Panel geometry, sizing policy, and color conversion for the ledwall
//! simulator.
//!
//! # Role in the workspace
//! `ledwall-core` is the leaf crate: it owns the physical panel description
//! (`PanelSpec`), the derived logical grid (`PixelGrid`), the render-scale
//! sizing policy, and the HSL/RGB conversions used by every stage of the
//! pipeline. It depends on nothing else in the workspace.
//!
//! # Invariants
//! - All conversion functions are pure and total; out-of-range inputs are
//!   wrapped or clamped, never rejected.
//! - `PanelSpec` is validated once at construction; everything derived from
//!   a valid spec is infallible.

pub mod color;
pub mod geometry;
pub mod sizing;

pub use color::{CellColor, hsl_to_rgb, rgb_to_hsl};
pub use geometry::{PanelError, PanelSpec, PixelGrid};
pub use sizing::{BASE_SCALE, MAX_RENDER_DIM, RenderScale, ScaleAdvisory};
