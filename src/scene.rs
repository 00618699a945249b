//! Scene building: resolved geometry plus palette to absolute spheres
//!
//! The cell box spans from the origin to `(a, b, c)`; each atom becomes a
//! sphere at its fractional position scaled by the cell edges.

use serde::Serialize;

use crate::cell::{CellError, DefinitionStore};
use crate::model::{Color, ResolvedGeometry};

/// A point in cell space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

/// The parametric cell box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellBox {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl CellBox {
    /// The eight corners, indexed by bit pattern (bit 0 = a, bit 1 = b, bit 2 = c)
    pub fn corners(&self) -> [Point3; 8] {
        std::array::from_fn(|i| {
            Point3::new(
                if i & 1 != 0 { self.a } else { 0.0 },
                if i & 2 != 0 { self.b } else { 0.0 },
                if i & 4 != 0 { self.c } else { 0.0 },
            )
        })
    }

    /// The twelve edges as corner pairs
    pub fn edges(&self) -> Vec<(Point3, Point3)> {
        let corners = self.corners();
        let mut edges = Vec::with_capacity(12);
        for i in 0..8usize {
            for bit in [1usize, 2, 4] {
                if i & bit == 0 {
                    edges.push((corners[i], corners[i | bit]));
                }
            }
        }
        edges
    }
}

/// One atom, ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sphere {
    pub element: String,
    pub center: Point3,
    pub color: Color,
    pub radius: f64,
}

/// Everything a renderer needs for one cell variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub cell: CellBox,
    pub spheres: Vec<Sphere>,
}

/// Build a scene from resolved geometry
///
/// Every element must have a palette entry; an unknown element fails with
/// [`CellError::ElementNotFound`] rather than falling back to a default.
/// A palette radius that is not a finite positive number fails with
/// [`CellError::InvalidRadius`].
pub fn build_scene(
    store: &DefinitionStore,
    geometry: &ResolvedGeometry,
    radius_scale: f64,
) -> Result<Scene, CellError> {
    let spheres = geometry
        .atoms
        .iter()
        .map(|atom| -> Result<Sphere, CellError> {
            let record = store.atom_type(&atom.element)?;
            if !record.radius.is_finite() || record.radius <= 0.0 {
                return Err(CellError::InvalidRadius {
                    element: atom.element.clone(),
                    radius: record.radius,
                });
            }
            let [x, y, z] = geometry.cartesian(atom);
            Ok(Sphere {
                element: atom.element.clone(),
                center: Point3::new(x, y, z),
                color: record.color.clone(),
                radius: record.radius * radius_scale,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scene {
        cell: CellBox {
            a: geometry.a,
            b: geometry.b,
            c: geometry.c,
        },
        spheres,
    })
}
