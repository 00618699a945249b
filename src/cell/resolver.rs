//! Cell resolution - flattens `base`/`bases` inheritance into plain geometry

use crate::model::{AtomPlacement, Axis, CellDefinition, ResolvedGeometry};

use super::store::{CellError, DefinitionStore};

/// Context for resolving variants of one cell
#[derive(Debug, Clone)]
pub struct ResolutionContext<'a> {
    /// Cell whose type namespace the base references live in
    pub cell: &'a str,
    /// Variants on the current ancestry path, outermost first (cycle detection)
    pub resolving: Vec<String>,
}

impl<'a> ResolutionContext<'a> {
    /// Create a context for a cell
    pub fn new(cell: &'a str) -> Self {
        Self {
            cell,
            resolving: Vec::new(),
        }
    }

    /// Check if a variant is currently being resolved
    pub fn is_resolving(&self, variant: &str) -> bool {
        self.resolving.iter().any(|v| v == variant)
    }

    /// Mark a variant as being resolved
    pub fn start_resolving(&mut self, variant: &str) {
        self.resolving.push(variant.to_string());
    }

    /// Mark the innermost variant as done
    pub fn done_resolving(&mut self) {
        self.resolving.pop();
    }

    /// The cycle closed by `variant`, from its first occurrence back to itself
    fn cycle_to(&self, variant: &str) -> Vec<String> {
        let start = self
            .resolving
            .iter()
            .position(|v| v == variant)
            .unwrap_or(0);
        let mut chain = self.resolving[start..].to_vec();
        chain.push(variant.to_string());
        chain
    }
}

/// Geometry of one level; dimensions may still be missing below the root
#[derive(Debug, Clone, Default)]
struct PartialGeometry {
    dims: [Option<f64>; 3],
    atoms: Vec<AtomPlacement>,
}

/// Resolve a cell variant, following its inheritance
///
/// Atoms from parents come first (`bases` in order, then `base`), followed by
/// the variant's own atoms. A dimension declared on a variant wins; a missing
/// one comes from the first parent that supplies it.
pub fn resolve(
    store: &DefinitionStore,
    cell: &str,
    variant: &str,
) -> Result<ResolvedGeometry, CellError> {
    let mut ctx = ResolutionContext::new(cell);
    let partial = resolve_variant(store, variant, &mut ctx)?;

    let missing: Vec<Axis> = Axis::ALL
        .iter()
        .zip(partial.dims.iter())
        .filter(|(_, dim)| dim.is_none())
        .map(|(axis, _)| *axis)
        .collect();

    match partial.dims {
        [Some(a), Some(b), Some(c)] => Ok(ResolvedGeometry {
            a,
            b,
            c,
            atoms: partial.atoms,
        }),
        _ => Err(CellError::IncompleteGeometry {
            cell: cell.to_string(),
            variant: variant.to_string(),
            missing,
        }),
    }
}

fn resolve_variant(
    store: &DefinitionStore,
    variant: &str,
    ctx: &mut ResolutionContext<'_>,
) -> Result<PartialGeometry, CellError> {
    let def = store.lookup(ctx.cell, variant)?;

    if ctx.is_resolving(variant) {
        return Err(CellError::CyclicDefinition {
            cell: ctx.cell.to_string(),
            chain: ctx.cycle_to(variant),
        });
    }

    log::trace!("resolving {}/{}", ctx.cell, variant);

    ctx.start_resolving(variant);
    let result = combine_with_parents(store, variant, def, ctx);
    ctx.done_resolving();
    result
}

fn combine_with_parents(
    store: &DefinitionStore,
    variant: &str,
    def: &CellDefinition,
    ctx: &mut ResolutionContext<'_>,
) -> Result<PartialGeometry, CellError> {
    let parents = def
        .parents()
        .map(|parent| resolve_variant(store, parent, ctx))
        .collect::<Result<Vec<_>, _>>()?;

    let mut resolved = PartialGeometry::default();

    for (i, axis) in Axis::ALL.iter().enumerate() {
        resolved.dims[i] = match def.dimension(*axis) {
            Some(value) if value.is_finite() && value > 0.0 => Some(value),
            Some(value) => {
                return Err(CellError::InvalidDimension {
                    cell: ctx.cell.to_string(),
                    variant: variant.to_string(),
                    axis: *axis,
                    value,
                })
            }
            None => parents.iter().find_map(|p| p.dims[i]),
        };
    }

    let own = def.atoms.len();
    let inherited: usize = parents.iter().map(|p| p.atoms.len()).sum();
    resolved.atoms.reserve(inherited + own);
    for parent in parents {
        resolved.atoms.extend(parent.atoms);
    }
    resolved.atoms.extend(def.atoms.iter().cloned());

    Ok(resolved)
}
