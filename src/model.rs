//! Data types shared by the store, the resolver and the scene builder

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three cell edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    A,
    B,
    C,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::A, Axis::B, Axis::C];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::A => write!(f, "a"),
            Axis::B => write!(f, "b"),
            Axis::C => write!(f, "c"),
        }
    }
}

/// Color of an atom type
///
/// Accepts the forms the viewer data has used over time: an integer
/// (`0xff0000`), a byte triple (`[255, 0, 0]`), or a string token that is
/// either a CSS color or a theme token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Hex(u32),
    Rgb([u8; 3]),
    Token(String),
}

impl Color {
    /// Render as a CSS color without consulting a theme
    pub fn to_css(&self) -> String {
        match self {
            Color::Hex(value) => format!("#{:06x}", value & 0x00ff_ffff),
            Color::Rgb([r, g, b]) => format!("#{:02x}{:02x}{:02x}", r, g, b),
            Color::Token(token) => match token.strip_prefix("0x") {
                Some(hex) if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                    format!("#{}", hex.to_ascii_lowercase())
                }
                _ => token.clone(),
            },
        }
    }
}

/// Palette entry for one chemical element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomTypeRecord {
    pub color: Color,
    pub radius: f64,
}

/// Fractional position of one atom within a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomPlacement {
    pub element: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AtomPlacement {
    pub fn new(element: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            element: element.into(),
            x,
            y,
            z,
        }
    }

    /// Fractional coordinates as an array, in axis order
    pub fn fractional(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Raw, unresolved definition of one cell variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    /// Atoms added by this definition (inherited atoms are not listed here)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub atoms: Vec<AtomPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
}

impl CellDefinition {
    /// Create an empty definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all three edge lengths
    pub fn with_dimensions(mut self, a: f64, b: f64, c: f64) -> Self {
        self.a = Some(a);
        self.b = Some(b);
        self.c = Some(c);
        self
    }

    /// Set a single edge length
    pub fn with_dimension(mut self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::A => self.a = Some(value),
            Axis::B => self.b = Some(value),
            Axis::C => self.c = Some(value),
        }
        self
    }

    pub fn with_atom(mut self, atom: AtomPlacement) -> Self {
        self.atoms.push(atom);
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    /// Edge length declared directly on this definition
    pub fn dimension(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::A => self.a,
            Axis::B => self.b,
            Axis::C => self.c,
        }
    }

    /// Parent references in resolution order: `bases` first, then `base`
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.bases
            .iter()
            .map(String::as_str)
            .chain(self.base.as_deref())
    }
}

/// Inheritance-free geometry ready for a renderer
///
/// Atom coordinates stay fractional; multiply by the matching dimension to
/// get a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGeometry {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub atoms: Vec<AtomPlacement>,
}

impl ResolvedGeometry {
    pub fn dimensions(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    /// Absolute position of an atom in this cell
    pub fn cartesian(&self, atom: &AtomPlacement) -> [f64; 3] {
        [atom.x * self.a, atom.y * self.b, atom.z * self.c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_css() {
        assert_eq!(Color::Hex(0xff0000).to_css(), "#ff0000");
        assert_eq!(Color::Hex(0x00ff).to_css(), "#0000ff");
        assert_eq!(Color::Rgb([0, 128, 255]).to_css(), "#0080ff");
        assert_eq!(Color::Token("0xABCDEF".to_string()).to_css(), "#abcdef");
        assert_eq!(Color::Token("red".to_string()).to_css(), "red");
    }

    #[test]
    fn test_color_deserialize_forms() {
        let hex: Color = serde_json::from_str("16711680").unwrap();
        assert_eq!(hex, Color::Hex(0xff0000));
        let rgb: Color = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(rgb, Color::Rgb([1, 2, 3]));
        let token: Color = serde_json::from_str("\"steelblue\"").unwrap();
        assert_eq!(token, Color::Token("steelblue".to_string()));
    }

    #[test]
    fn test_definition_parents_order() {
        let def = CellDefinition::new()
            .with_base("single")
            .with_bases(["first", "second"]);
        let parents: Vec<&str> = def.parents().collect();
        assert_eq!(parents, vec!["first", "second", "single"]);
    }

    #[test]
    fn test_definition_deserialize_defaults() {
        let def: CellDefinition = serde_json::from_str(r#"{"base": "fcc"}"#).unwrap();
        assert_eq!(def.base.as_deref(), Some("fcc"));
        assert!(def.atoms.is_empty());
        assert!(def.bases.is_empty());
        assert_eq!(def.a, None);
    }

    #[test]
    fn test_cartesian_scales_by_dimensions() {
        let geometry = ResolvedGeometry {
            a: 2.0,
            b: 4.0,
            c: 8.0,
            atoms: vec![],
        };
        let atom = AtomPlacement::new("Na", 0.5, 0.25, 1.0);
        assert_eq!(geometry.cartesian(&atom), [1.0, 1.0, 8.0]);
    }
}
