//! Figure rendering for moisture-uptake case studies.
//!
//! Implements two plot types:
//! - Filled-contour map on a Plate Carrée background with the transect drawn on top
//! - Cross-section of a layered field along the transect
//!
//! Both are drawn with a discrete colormap and encoded as PNG.

pub mod axes;
pub mod colorbar;
pub mod colormap;
pub mod contour;
pub mod error;
pub mod figure;
pub mod map;
pub mod png;
pub mod section_plot;
pub mod style;
pub mod text;

pub use colormap::{
    create_custom_colormap, custom_levels, from_levels_and_colors, Color, DiscreteColormap,
    Extend, ListedColormap,
};
pub use error::{ColormapError, RenderError, RenderResult};
pub use map::{render_moisture_map, MapOptions};
pub use png::{encode_png, save_png};
pub use section_plot::{render_cross_section, section_levels, SectionOptions};
pub use style::PlotStyle;
