//! Theme colors for rendered snapshots
//!
//! A theme maps symbolic tokens to concrete CSS colors. The renderer reads
//! `background` and `cell-edge`; atom colors that name a token are mapped
//! through the theme, anything else is used as a literal CSS color.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::Color;

/// Errors that can occur when loading or parsing themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A theme mapping symbolic colors to concrete values
#[derive(Debug, Clone)]
pub struct Theme {
    /// Optional name for the theme
    pub name: Option<String>,
    /// Color mappings: token name -> CSS color
    pub colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlTheme {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

/// Light gray background with black cell edges
const DEFAULT_THEME: &str = r##"
[colors]
background = "#f0f0f0"
cell-edge = "#000000"
atom-outline = "#333333"
"##;

impl Theme {
    /// Load theme from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load theme from TOML string
    ///
    /// Tokens the string leaves out keep their default values.
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;
        let mut colors = default_colors();
        colors.extend(parsed.colors);

        Ok(Theme {
            name: parsed.metadata.and_then(|m| m.name),
            colors,
        })
    }

    /// Resolve a symbolic token to a concrete value
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    pub fn background(&self) -> &str {
        self.resolve("background").unwrap_or("#f0f0f0")
    }

    pub fn cell_edge(&self) -> &str {
        self.resolve("cell-edge").unwrap_or("#000000")
    }

    pub fn atom_outline(&self) -> &str {
        self.resolve("atom-outline").unwrap_or("#333333")
    }

    /// CSS color for an atom color, mapping theme tokens first
    pub fn css_color(&self, color: &Color) -> String {
        match color {
            Color::Token(token) => match self.resolve(token) {
                Some(mapped) => mapped.to_string(),
                None => color.to_css(),
            },
            other => other.to_css(),
        }
    }
}

fn default_colors() -> HashMap<String, String> {
    toml::from_str::<TomlTheme>(DEFAULT_THEME)
        .map(|t| t.colors)
        .unwrap_or_default()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: None,
            colors: default_colors(),
        }
    }
}
