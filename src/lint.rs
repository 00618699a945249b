//! Lint checks for data-quality problems in a definition store.
//!
//! Resolution only fails for the variant being viewed; lint walks every
//! definition so broken variants and palette gaps show up before anyone
//! selects them.

use std::collections::HashSet;
use std::fmt;

use crate::cell::DefinitionStore;

/// A lint warning about a data defect
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Unresolved,
    Element,
    Coordinate,
    Palette,
    Unused,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Unresolved => write!(f, "unresolved"),
            LintCategory::Element => write!(f, "element"),
            LintCategory::Coordinate => write!(f, "coordinate"),
            LintCategory::Palette => write!(f, "palette"),
            LintCategory::Unused => write!(f, "unused"),
        }
    }
}

/// Run all lint checks on a store.
pub fn check(store: &DefinitionStore) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_resolution(store, &mut warnings);
    check_atoms(store, &mut warnings);
    check_palette(store, &mut warnings);
    warnings
}

fn warn(warnings: &mut Vec<LintWarning>, category: LintCategory, message: String) {
    warnings.push(LintWarning { category, message });
}

// ── Resolution ────────────────────────────────────────────────────

fn check_resolution(store: &DefinitionStore, warnings: &mut Vec<LintWarning>) {
    for (cell, variant, _) in store.definitions() {
        if let Err(e) = store.resolve(cell, variant) {
            warn(
                warnings,
                LintCategory::Unresolved,
                format!("{}/{} does not resolve: {}", cell, variant, e),
            );
        }
    }
}

// ── Atom placements ───────────────────────────────────────────────

fn check_atoms(store: &DefinitionStore, warnings: &mut Vec<LintWarning>) {
    let mut reported = HashSet::new();
    for (cell, variant, def) in store.definitions() {
        for (i, atom) in def.atoms.iter().enumerate() {
            if store.atom_type(&atom.element).is_err() && reported.insert(atom.element.clone())
            {
                warn(
                    warnings,
                    LintCategory::Element,
                    format!(
                        "element \"{}\" used in {}/{} has no atom type",
                        atom.element, cell, variant
                    ),
                );
            }

            let outside = atom
                .fractional()
                .iter()
                .any(|v| !v.is_finite() || *v < 0.0 || *v > 1.0);
            if outside {
                warn(
                    warnings,
                    LintCategory::Coordinate,
                    format!(
                        "atom #{} ({}) in {}/{} lies outside the cell: ({}, {}, {})",
                        i + 1,
                        atom.element,
                        cell,
                        variant,
                        atom.x,
                        atom.y,
                        atom.z
                    ),
                );
            }
        }
    }
}

// ── Palette ───────────────────────────────────────────────────────

fn check_palette(store: &DefinitionStore, warnings: &mut Vec<LintWarning>) {
    let used: HashSet<&str> = store
        .definitions()
        .flat_map(|(_, _, def)| def.atoms.iter().map(|a| a.element.as_str()))
        .collect();

    for (element, record) in store.atom_types() {
        if !record.radius.is_finite() || record.radius <= 0.0 {
            warn(
                warnings,
                LintCategory::Palette,
                format!("atom type \"{}\" has invalid radius {}", element, record.radius),
            );
        }
        if !used.contains(element) {
            warn(
                warnings,
                LintCategory::Unused,
                format!("atom type \"{}\" is never used", element),
            );
        }
    }
}
