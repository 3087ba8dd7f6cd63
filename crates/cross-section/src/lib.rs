//! Vertical cross-sections through layered moisture fields.
//!
//! A section samples every layer of a [`case_common::LayeredField`] at evenly
//! spaced points of the great circle between two endpoints, giving a
//! `[layer][step]` array ready for a height/distance contour plot.

pub mod error;
pub mod interpolation;
pub mod section;

pub use error::{CrossSectionError, CrossSectionResult};
pub use interpolation::{
    bilinear_interpolate, nearest_interpolate, sample_field, InterpolationMethod,
};
pub use section::{cross_section, cross_section_with, CrossSection, DEFAULT_STEPS};
