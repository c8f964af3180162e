//! chemviz-chem — in-process cheminformatics for the chemviz pipeline.
//!
//! Capabilities:
//!   - SMILES parsing into an in-memory molecular graph
//!   - explicit hydrogen expansion
//!   - seeded, deterministic 3D embedding
//!   - force-field geometry refinement
//!   - scalar descriptors (MW, logP, TPSA, HBD/HBA, rotatable bonds, rings)
//!   - V2000 molblock serialization for external rendering
//!
//! Everything here is synchronous and pure; no network, no global state.

pub mod descriptors;
pub mod element;
pub mod embed;
mod error;
pub mod forcefield;
pub mod hydrogens;
pub mod molblock;
pub mod molecule;
pub mod smiles;

pub use element::Element;
pub use error::{ChemError, Result};
pub use molecule::{Atom, Bond, BondOrder, Molecule};
