//! SVG renderer producing a static snapshot of a scene
//!
//! This module projects a [`Scene`](crate::scene::Scene) orthographically and
//! writes the cell edges and atoms as SVG with CSS classes for styling.

pub mod config;
pub mod projection;
pub mod svg;

pub use config::SvgConfig;
pub use projection::Projection;
pub use svg::{render_svg, render_svg_with_theme};
