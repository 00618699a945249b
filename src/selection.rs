//! Current cell/type selection with the viewer's default rules
//!
//! The first declared cell and its first declared type are selected on load.
//! Switching the cell resets the type to that cell's first type.

use crate::cell::{CellError, DefinitionStore};
use crate::model::ResolvedGeometry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub cell: String,
    pub variant: String,
}

impl Selection {
    /// Validate an explicit selection against the store
    pub fn new(store: &DefinitionStore, cell: &str, variant: &str) -> Result<Self, CellError> {
        store.lookup(cell, variant)?;
        Ok(Self {
            cell: cell.to_string(),
            variant: variant.to_string(),
        })
    }

    /// First cell and its first type, if the store has any
    pub fn first(store: &DefinitionStore) -> Option<Self> {
        store.cell_names().find_map(|cell| Self::first_of(store, cell).ok())
    }

    /// First type of the given cell
    pub fn first_of(store: &DefinitionStore, cell: &str) -> Result<Self, CellError> {
        let variant = store
            .types_for(cell)?
            .first()
            .map(|v| v.to_string())
            .ok_or_else(|| CellError::VariantNotFound {
                cell: cell.to_string(),
                variant: String::new(),
            })?;
        Ok(Self {
            cell: cell.to_string(),
            variant,
        })
    }

    /// Switch to another cell, resetting the type to its first one
    pub fn select_cell(&mut self, store: &DefinitionStore, cell: &str) -> Result<(), CellError> {
        *self = Self::first_of(store, cell)?;
        Ok(())
    }

    /// Switch to another type of the current cell
    pub fn select_variant(
        &mut self,
        store: &DefinitionStore,
        variant: &str,
    ) -> Result<(), CellError> {
        store.lookup(&self.cell, variant)?;
        self.variant = variant.to_string();
        Ok(())
    }

    /// Resolve the selected variant
    pub fn resolve(&self, store: &DefinitionStore) -> Result<ResolvedGeometry, CellError> {
        store.resolve(&self.cell, &self.variant)
    }
}
