//! Cell definitions and their inheritance resolution
//!
//! A cell groups related variants ("types"). A variant may inherit its edge
//! lengths and atoms from other variants of the same cell through `base`
//! (one parent) or `bases` (several parents, combined in order):
//!
//! ```text
//! NaCl:
//!   base:   { a: 1, b: 1, c: 1, atoms: [Na at 0,0,0] }
//!   withCl: { base: "base", atoms: [Cl at .5,.5,.5] }
//!
//! resolve(NaCl, withCl) = { a: 1, b: 1, c: 1, atoms: [Na, Cl] }
//! ```

mod resolver;
mod store;

pub use resolver::{resolve, ResolutionContext};
pub use store::{CellError, DefinitionStore};
