//! 3D conformer construction from verified notation.

use std::sync::Arc;

use chemviz_chem::Molecule;
use tracing::{debug, warn};

use crate::error::Result;
use crate::toolkit::ToolkitAdapter;

/// Seed for the initial embedding; fixed so repeated queries for the same
/// compound render identically.
pub const DEFAULT_EMBED_SEED: u64 = 42;

/// Iteration cap for the geometry refinement.
pub const DEFAULT_MAX_OPT_ITERATIONS: usize = 200;

/// Builds an optimized 3D structure for a notation: parse, add hydrogens,
/// embed with a fixed seed, refine.
#[derive(Clone)]
pub struct ConformerBuilder {
    toolkit: Arc<dyn ToolkitAdapter>,
    seed: u64,
    max_opt_iterations: usize,
}

impl ConformerBuilder {
    pub fn new(toolkit: Arc<dyn ToolkitAdapter>) -> Self {
        ConformerBuilder {
            toolkit,
            seed: DEFAULT_EMBED_SEED,
            max_opt_iterations: DEFAULT_MAX_OPT_ITERATIONS,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iterations(mut self, max_opt_iterations: usize) -> Self {
        self.max_opt_iterations = max_opt_iterations;
        self
    }

    /// Fully built molecule with explicit hydrogens and 3D coordinates.
    ///
    /// Fails with `InvalidNotation` or `EmbeddingFailure`. Non-convergence
    /// of the refinement keeps the embedded geometry and is not an error.
    pub fn build(&self, notation: &str) -> Result<Molecule> {
        let parsed = self.toolkit.parse(notation)?;
        let mut mol = self.toolkit.add_hydrogens(&parsed);
        self.toolkit.embed_3d(&mut mol, self.seed)?;

        let outcome = self.toolkit.optimize_geometry(&mut mol, self.max_opt_iterations);
        if outcome.converged {
            debug!(
                "geometry converged after {} iterations, rms gradient {:.2e}",
                outcome.iterations, outcome.rms_gradient
            );
        } else {
            warn!(
                "geometry refinement hit the {} iteration cap (rms gradient {:.2e}), keeping current coordinates",
                self.max_opt_iterations, outcome.rms_gradient
            );
        }
        Ok(mol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::toolkit::RustToolkit;

    fn builder() -> ConformerBuilder {
        ConformerBuilder::new(Arc::new(RustToolkit::new()))
    }

    #[test]
    fn test_build_expands_hydrogens_and_places_atoms() {
        let mol = builder().build("CCO").unwrap();
        assert_eq!(mol.heavy_atom_count(), 3);
        assert_eq!(mol.atom_count(), 9);
        let placed = mol
            .atoms
            .iter()
            .any(|atom| atom.position.iter().any(|&c| c.abs() > 1e-6));
        assert!(placed, "all atoms left at the origin");
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = builder().build("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let second = builder().build("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(first.atom_count(), second.atom_count());
        for (a, b) in first.atoms.iter().zip(&second.atoms) {
            assert_eq!(a.element, b.element);
            for axis in 0..3 {
                assert!((a.position[axis] - b.position[axis]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_seed_changes_geometry() {
        let base = builder().build("CCCC").unwrap();
        let reseeded = builder().with_seed(7).build("CCCC").unwrap();
        let moved = base
            .atoms
            .iter()
            .zip(&reseeded.atoms)
            .any(|(a, b)| {
                (0..3).any(|axis| (a.position[axis] - b.position[axis]).abs() > 1e-6)
            });
        assert!(moved, "different seeds produced identical coordinates");
    }

    #[test]
    fn test_invalid_notation_fails_fast() {
        let err = builder().build("not a molecule").unwrap_err();
        assert!(matches!(err, CoreError::InvalidNotation(_)));
    }

    #[test]
    fn test_disconnected_input_is_embedding_failure() {
        let err = builder().build("C.C").unwrap_err();
        assert!(matches!(err, CoreError::EmbeddingFailure(_)));
    }
}
