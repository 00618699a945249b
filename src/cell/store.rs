//! Definition store holding raw cell definitions and the atom palette

use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;

use crate::document::{CellVariants, Document, DocumentError};
use crate::model::{AtomTypeRecord, Axis, CellDefinition, ResolvedGeometry};

/// Errors that can occur while looking up or resolving cell definitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    /// Cell name not present in the store
    #[error("cell not found: {cell}")]
    CellNotFound { cell: String },

    /// Type name not present under an existing cell
    #[error("type not found: {variant} in cell {cell}")]
    VariantNotFound { cell: String, variant: String },

    /// Element symbol without a palette entry
    #[error("atom type not found: {element}")]
    ElementNotFound { element: String },

    /// Base references loop back on themselves
    #[error("cyclic definition in cell {cell}: {}", chain.join(" -> "))]
    CyclicDefinition { cell: String, chain: Vec<String> },

    /// Some edge lengths were never supplied along the inheritance chain
    #[error("incomplete geometry for {cell}/{variant}: missing {}", join_axes(missing))]
    IncompleteGeometry {
        cell: String,
        variant: String,
        missing: Vec<Axis>,
    },

    /// An edge length is declared but is not a finite positive number
    #[error("invalid dimension {axis} = {value} for {cell}/{variant}")]
    InvalidDimension {
        cell: String,
        variant: String,
        axis: Axis,
        value: f64,
    },

    /// A palette radius is not a finite positive number
    #[error("invalid radius {radius} for atom type {element}")]
    InvalidRadius { element: String, radius: f64 },
}

impl CellError {
    /// True for the lookup failures (unknown cell, type or element)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CellError::CellNotFound { .. }
                | CellError::VariantNotFound { .. }
                | CellError::ElementNotFound { .. }
        )
    }
}

fn join_axes(axes: &[Axis]) -> String {
    axes.iter()
        .map(Axis::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read-only store of cell definitions and atom types
///
/// Built once from one or more documents. Cells and types keep the order in
/// which they were first declared.
#[derive(Debug, Clone, Default)]
pub struct DefinitionStore {
    cells: IndexMap<String, CellVariants>,
    atom_types: IndexMap<String, AtomTypeRecord>,
}

impl DefinitionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store by merging documents in order
    ///
    /// A later `(cell, type)` entry replaces an earlier one as a whole; the
    /// same applies to atom types. Replaced entries keep their position.
    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut store = Self::new();
        for doc in documents {
            store.merge(doc);
        }
        log::debug!(
            "definition store ready: {} cells, {} atom types",
            store.cells.len(),
            store.atom_types.len()
        );
        store
    }

    /// Load every file and merge them in the given order
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, DocumentError> {
        let documents = paths
            .iter()
            .map(|p| Document::from_file(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_documents(documents))
    }

    fn merge(&mut self, doc: Document) {
        for (cell, variants) in doc.cells {
            let entry = self.cells.entry(cell.clone()).or_default();
            for (variant, def) in variants {
                if entry.insert(variant.clone(), def).is_some() {
                    log::debug!("replacing definition {}/{}", cell, variant);
                }
            }
        }
        for (element, record) in doc.atom_types {
            if self.atom_types.insert(element.clone(), record).is_some() {
                log::debug!("replacing atom type {}", element);
            }
        }
    }

    /// Get the raw definition of a cell variant
    pub fn lookup(&self, cell: &str, variant: &str) -> Result<&CellDefinition, CellError> {
        self.variants(cell)?
            .get(variant)
            .ok_or_else(|| CellError::VariantNotFound {
                cell: cell.to_string(),
                variant: variant.to_string(),
            })
    }

    /// Type names of a cell in declaration order
    pub fn types_for(&self, cell: &str) -> Result<Vec<&str>, CellError> {
        Ok(self.variants(cell)?.keys().map(String::as_str).collect())
    }

    /// Cell names in declaration order
    pub fn cell_names(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Check if a cell exists
    pub fn contains_cell(&self, cell: &str) -> bool {
        self.cells.contains_key(cell)
    }

    /// Get the palette entry of an element
    pub fn atom_type(&self, element: &str) -> Result<&AtomTypeRecord, CellError> {
        self.atom_types
            .get(element)
            .ok_or_else(|| CellError::ElementNotFound {
                element: element.to_string(),
            })
    }

    /// All palette entries in declaration order
    pub fn atom_types(&self) -> impl Iterator<Item = (&str, &AtomTypeRecord)> {
        self.atom_types.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All definitions as `(cell, type, definition)` in declaration order
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &str, &CellDefinition)> {
        self.cells.iter().flat_map(|(cell, variants)| {
            variants
                .iter()
                .map(move |(variant, def)| (cell.as_str(), variant.as_str(), def))
        })
    }

    /// Resolve a cell variant into flat geometry
    pub fn resolve(&self, cell: &str, variant: &str) -> Result<ResolvedGeometry, CellError> {
        super::resolve(self, cell, variant)
    }

    fn variants(&self, cell: &str) -> Result<&CellVariants, CellError> {
        self.cells.get(cell).ok_or_else(|| CellError::CellNotFound {
            cell: cell.to_string(),
        })
    }
}

impl From<Document> for DefinitionStore {
    fn from(doc: Document) -> Self {
        Self::from_documents([doc])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AtomPlacement, Color};
    use insta::assert_snapshot;

    fn doc_with(cell: &str, variant: &str, def: CellDefinition) -> Document {
        let mut variants = CellVariants::new();
        variants.insert(variant.to_string(), def);
        let mut doc = Document::default();
        doc.cells.insert(cell.to_string(), variants);
        doc
    }

    fn oxygen() -> Document {
        let mut doc = Document::default();
        doc.atom_types.insert(
            "O".to_string(),
            AtomTypeRecord {
                color: Color::Token("red".to_string()),
                radius: 0.5,
            },
        );
        doc
    }

    #[test]
    fn test_lookup_and_not_found() {
        let store = DefinitionStore::from(doc_with(
            "NaCl",
            "base",
            CellDefinition::new().with_dimensions(1.0, 1.0, 1.0),
        ));

        assert_eq!(store.lookup("NaCl", "base").unwrap().a, Some(1.0));
        assert!(matches!(
            store.lookup("KCl", "base"),
            Err(CellError::CellNotFound { .. })
        ));
        assert!(matches!(
            store.lookup("NaCl", "rocksalt"),
            Err(CellError::VariantNotFound { .. })
        ));
        assert!(matches!(
            store.types_for("KCl"),
            Err(CellError::CellNotFound { .. })
        ));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let store = DefinitionStore::from_documents([
            doc_with("zeta", "z2", CellDefinition::new()),
            doc_with("zeta", "z1", CellDefinition::new()),
            doc_with("alpha", "a1", CellDefinition::new()),
        ]);

        assert_eq!(store.cell_names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(store.types_for("zeta").unwrap(), vec!["z2", "z1"]);
    }

    #[test]
    fn test_later_document_replaces_whole_record() {
        let first = CellDefinition::new()
            .with_dimensions(1.0, 2.0, 3.0)
            .with_atom(AtomPlacement::new("O", 0.0, 0.0, 0.0));
        let second = CellDefinition::new().with_dimension(Axis::A, 5.0);
        let store = DefinitionStore::from_documents([
            doc_with("cell", "base", first),
            doc_with("cell", "other", CellDefinition::new()),
            doc_with("cell", "base", second.clone()),
        ]);

        assert_eq!(store.lookup("cell", "base").unwrap(), &second);
        // replaced entries keep their first position
        assert_eq!(store.types_for("cell").unwrap(), vec!["base", "other"]);
    }

    #[test]
    fn test_atom_type_lookup() {
        let store = DefinitionStore::from(oxygen());
        assert_eq!(store.atom_type("O").unwrap().radius, 0.5);

        let err = store.atom_type("H").unwrap_err();
        assert!(err.is_not_found());
        assert_snapshot!(err.to_string(), @"atom type not found: H");
    }

    #[test]
    fn test_palette_and_cells_from_separate_documents() {
        let store = DefinitionStore::from_documents([
            doc_with("cell", "base", CellDefinition::new()),
            oxygen(),
        ]);
        assert!(store.contains_cell("cell"));
        assert!(store.atom_type("O").is_ok());
    }

    #[test]
    fn test_error_messages() {
        let cyclic = CellError::CyclicDefinition {
            cell: "NaCl".to_string(),
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_snapshot!(cyclic.to_string(), @"cyclic definition in cell NaCl: a -> b -> a");

        let incomplete = CellError::IncompleteGeometry {
            cell: "NaCl".to_string(),
            variant: "bare".to_string(),
            missing: vec![Axis::B, Axis::C],
        };
        assert_snapshot!(incomplete.to_string(), @"incomplete geometry for NaCl/bare: missing b, c");
        assert!(!incomplete.is_not_found());
    }
}
