//! Celdilla - crystallographic unit cells with inheritance
//!
//! This library loads declarative cell definitions, resolves `base`/`bases`
//! inheritance into flat geometry, and turns the result into a scene or a
//! static SVG snapshot.
//!
//! # Example
//!
//! ```rust
//! use celdilla::{render, Document, DefinitionStore};
//!
//! let doc = Document::from_json_str(r#"{
//!     "cells": {"NaCl": {
//!         "base": {"a": 1, "b": 1, "c": 1,
//!                  "atoms": [{"element": "Na", "x": 0, "y": 0, "z": 0}]},
//!         "withCl": {"base": "base",
//!                    "atoms": [{"element": "Cl", "x": 0.5, "y": 0.5, "z": 0.5}]}
//!     }},
//!     "atomTypes": {
//!         "Na": {"color": "purple", "radius": 0.4},
//!         "Cl": {"color": "green", "radius": 0.6}
//!     }
//! }"#).unwrap();
//! let store = DefinitionStore::from(doc);
//!
//! let geometry = store.resolve("NaCl", "withCl").unwrap();
//! assert_eq!(geometry.atoms.len(), 2);
//!
//! let svg = render(&store, "NaCl", "withCl").unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod cell;
pub mod document;
pub mod error;
pub mod lint;
pub mod model;
pub mod renderer;
pub mod scene;
pub mod selection;
pub mod theme;

pub use cell::{resolve, CellError, DefinitionStore};
pub use document::{Document, DocumentError, DocumentFormat};
pub use error::SyntaxError;
pub use model::{AtomPlacement, AtomTypeRecord, Axis, CellDefinition, Color, ResolvedGeometry};
pub use renderer::{render_svg, render_svg_with_theme, SvgConfig};
pub use scene::{build_scene, Scene};
pub use selection::Selection;
pub use theme::{Theme, ThemeError};

use thiserror::Error;

/// Errors that can occur anywhere in the load-resolve-render pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Error while loading a data document
    #[error("{0}")]
    Document(#[from] DocumentError),

    /// Error while loading a theme
    #[error("theme error: {0}")]
    Theme(#[from] ThemeError),

    /// Error while resolving a cell or building its scene
    #[error("{0}")]
    Cell(#[from] CellError),

    /// Radius multiplier that is not a finite positive number
    #[error("invalid radius scale: {0} (must be a positive number)")]
    InvalidRadiusScale(f64),

    /// The store has no cell with at least one type
    #[error("no cell definitions loaded")]
    NoCells,
}

/// Configuration for the complete view pipeline
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Multiplier applied to every palette radius
    pub radius_scale: f64,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Theme for background, edges and color tokens
    pub theme: Theme,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            radius_scale: 1.0,
            svg: SvgConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl ViewConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the radius multiplier
    pub fn with_radius_scale(mut self, scale: f64) -> Self {
        self.radius_scale = scale;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn validated_radius_scale(&self) -> Result<f64, Error> {
        if self.radius_scale.is_finite() && self.radius_scale > 0.0 {
            Ok(self.radius_scale)
        } else {
            Err(Error::InvalidRadiusScale(self.radius_scale))
        }
    }
}

/// Resolve a cell variant and build its scene
pub fn scene_for(
    store: &DefinitionStore,
    cell: &str,
    variant: &str,
    config: &ViewConfig,
) -> Result<Scene, Error> {
    let radius_scale = config.validated_radius_scale()?;
    let geometry = store.resolve(cell, variant)?;
    log::info!(
        "resolved {}/{}: {} x {} x {}, {} atoms",
        cell,
        variant,
        geometry.a,
        geometry.b,
        geometry.c,
        geometry.atoms.len()
    );
    Ok(build_scene(store, &geometry, radius_scale)?)
}

/// Render a cell variant to SVG with default configuration
pub fn render(store: &DefinitionStore, cell: &str, variant: &str) -> Result<String, Error> {
    render_with_config(store, cell, variant, &ViewConfig::default())
}

/// Render a cell variant to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use celdilla::{render_with_config, Document, DefinitionStore, SvgConfig, ViewConfig};
///
/// let doc = Document::from_json_str(r#"{
///     "cells": {"Po": {"sc": {"a": 3.35, "b": 3.35, "c": 3.35,
///         "atoms": [{"element": "Po", "x": 0, "y": 0, "z": 0}]}}},
///     "atomTypes": {"Po": {"color": 11141375, "radius": 1.0}}
/// }"#).unwrap();
/// let store = DefinitionStore::from(doc);
///
/// let config = ViewConfig::new()
///     .with_radius_scale(0.5)
///     .with_svg(SvgConfig::default().with_scale(40.0));
///
/// let svg = render_with_config(&store, "Po", "sc", &config).unwrap();
/// assert!(svg.contains("<circle"));
/// ```
pub fn render_with_config(
    store: &DefinitionStore,
    cell: &str,
    variant: &str,
    config: &ViewConfig,
) -> Result<String, Error> {
    let scene = scene_for(store, cell, variant, config)?;
    Ok(render_svg_with_theme(&scene, &config.svg, &config.theme))
}
