//! Foundational primitives for volumetric segmentation.
//!
//! ## Volumes
//! A [`Volume`] is an owned, dense, contiguous 3D grid addressed as
//! `(x, y, z)` with linear index `(z * height + y) * width + x`.
//! Segmentation volumes hold integer labels where `0` is background and
//! initial fragments are consecutively numbered starting at `1`.

mod error;
mod volume;

pub use error::Error;
pub use volume::Volume;
