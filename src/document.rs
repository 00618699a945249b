//! Declarative data documents holding cell definitions and the atom palette
//!
//! A document has two sections, `cells` and `atomTypes`. The viewer data is
//! JSON; TOML is accepted as well:
//!
//! ```toml
//! [atomTypes.Na]
//! color = "purple"
//! radius = 0.5
//!
//! [cells.NaCl.base]
//! a = 1.0
//! b = 1.0
//! c = 1.0
//! atoms = [{ element = "Na", x = 0.0, y = 0.0, z = 0.0 }]
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SyntaxError;
use crate::model::{AtomTypeRecord, CellDefinition};

/// Variants of one cell, keyed by type name in declaration order
pub type CellVariants = IndexMap<String, CellDefinition>;

/// Errors that can occur when loading a data document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {error}", path.display())]
    Syntax {
        path: PathBuf,
        error: SyntaxError,
        /// Full document text, kept for annotated reports
        source_text: String,
    },

    #[error("unsupported document extension for {} (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl DocumentError {
    /// Render the error, with source context for syntax errors
    pub fn report(&self) -> String {
        match self {
            DocumentError::Syntax {
                path,
                error,
                source_text,
            } => error.format(source_text, &path.display().to_string()),
            other => other.to_string(),
        }
    }
}

/// Supported document encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DocumentFormat::Json),
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }
}

/// One loaded data fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub cells: IndexMap<String, CellVariants>,
    #[serde(default)]
    pub atom_types: IndexMap<String, AtomTypeRecord>,
}

impl Document {
    /// Load a document from a file, choosing the format by extension
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let format =
            DocumentFormat::from_path(path).ok_or_else(|| DocumentError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading {:?} document {}", format, path.display());
        Self::parse(&content, format).map_err(|error| DocumentError::Syntax {
            path: path.to_path_buf(),
            error,
            source_text: content,
        })
    }

    /// Parse a document from text in the given format
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, SyntaxError> {
        match format {
            DocumentFormat::Json => Self::from_json_str(content),
            DocumentFormat::Toml => Self::from_toml_str(content),
        }
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> Result<Self, SyntaxError> {
        serde_json::from_str(content).map_err(|e| SyntaxError::from_json(&e, content))
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, SyntaxError> {
        toml::from_str(content).map_err(|e| SyntaxError::from_toml(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AtomPlacement, Color};

    const NACL_JSON: &str = r#"{
        "cells": {
            "NaCl": {
                "base": {"a": 1, "b": 1, "c": 1, "atoms": [{"element": "Na", "x": 0, "y": 0, "z": 0}]},
                "withCl": {"base": "base", "atoms": [{"element": "Cl", "x": 0.5, "y": 0.5, "z": 0.5}]}
            }
        },
        "atomTypes": {
            "Na": {"color": 11141375, "radius": 0.5},
            "Cl": {"color": "green", "radius": 0.8}
        }
    }"#;

    #[test]
    fn test_parse_json_document() {
        let doc = Document::from_json_str(NACL_JSON).expect("Should parse");
        let nacl = &doc.cells["NaCl"];
        assert_eq!(nacl["base"].a, Some(1.0));
        assert_eq!(nacl["withCl"].base.as_deref(), Some("base"));
        assert_eq!(
            nacl["withCl"].atoms,
            vec![AtomPlacement::new("Cl", 0.5, 0.5, 0.5)]
        );
        assert_eq!(doc.atom_types["Na"].color, Color::Hex(11141375));
        assert_eq!(doc.atom_types["Cl"].radius, 0.8);
    }

    #[test]
    fn test_json_preserves_declaration_order() {
        let doc = Document::from_json_str(
            r#"{"cells": {"zeta": {"z2": {}, "z1": {}}, "alpha": {"a1": {}}}}"#,
        )
        .expect("Should parse");
        let cells: Vec<&str> = doc.cells.keys().map(String::as_str).collect();
        assert_eq!(cells, vec!["zeta", "alpha"]);
        let types: Vec<&str> = doc.cells["zeta"].keys().map(String::as_str).collect();
        assert_eq!(types, vec!["z2", "z1"]);
    }

    #[test]
    fn test_parse_toml_document() {
        let toml_str = r#"
[atomTypes.O]
color = "red"
radius = 0.5

[cells.Rutile.base]
a = 4.59
b = 4.59
c = 2.96
atoms = [{ element = "O", x = 0.3, y = 0.3, z = 0.0 }]

[cells.Rutile.stretched]
base = "base"
c = 3.2
"#;
        let doc = Document::from_toml_str(toml_str).expect("Should parse");
        assert_eq!(doc.cells["Rutile"]["base"].a, Some(4.59));
        assert_eq!(doc.cells["Rutile"]["stretched"].c, Some(3.2));
        assert_eq!(doc.atom_types["O"].color, Color::Token("red".to_string()));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let doc = Document::from_json_str(r#"{"atomTypes": {}}"#).expect("Should parse");
        assert!(doc.cells.is_empty());
        let doc = Document::from_json_str("{}").expect("Should parse");
        assert!(doc.atom_types.is_empty());
    }

    #[test]
    fn test_invalid_json_error() {
        let result = Document::from_json_str("{\"cells\": {\"NaCl\": 3}}");
        let err = result.expect_err("Should fail");
        assert_eq!(err.format, "JSON");
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Document::from_toml_str("this is not valid toml {{{{");
        assert!(result.is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("data/celdilla.json")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("palette.TOML")),
            Some(DocumentFormat::Toml)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("cells.yaml")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("cells")), None);
    }

    #[test]
    fn test_unsupported_file_extension() {
        let err = Document::from_file(Path::new("cells.yaml")).expect_err("Should fail");
        assert!(matches!(err, DocumentError::UnsupportedFormat { .. }));
    }
}
