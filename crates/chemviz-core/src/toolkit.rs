//! Toolkit seam between the pipeline and the cheminformatics backend.
//!
//! Every chemistry capability the pipeline needs goes through
//! [`ToolkitAdapter`], so tests can substitute scripted behavior and the
//! backend can be swapped without touching resolution or assembly code.

use chemviz_chem::forcefield::OptimizeOutcome;
use chemviz_chem::{descriptors, embed, forcefield, hydrogens, molblock, smiles, Molecule};

use crate::error::Result;

// ── Descriptor enumeration ─────────────────────────────────────────────────

/// The scalar descriptors the pipeline reports, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Descriptor {
    MolecularWeight,
    LogP,
    Tpsa,
    RotatableBonds,
    HBondDonors,
    HBondAcceptors,
    HeavyAtoms,
    Rings,
}

impl Descriptor {
    pub const ALL: [Descriptor; 8] = [
        Descriptor::MolecularWeight,
        Descriptor::LogP,
        Descriptor::Tpsa,
        Descriptor::RotatableBonds,
        Descriptor::HBondDonors,
        Descriptor::HBondAcceptors,
        Descriptor::HeavyAtoms,
        Descriptor::Rings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Descriptor::MolecularWeight => "Molecular Weight",
            Descriptor::LogP => "LogP",
            Descriptor::Tpsa => "TPSA",
            Descriptor::RotatableBonds => "Rotatable Bonds",
            Descriptor::HBondDonors => "H-Bond Donors",
            Descriptor::HBondAcceptors => "H-Bond Acceptors",
            Descriptor::HeavyAtoms => "Heavy Atoms",
            Descriptor::Rings => "Rings",
        }
    }

    /// Unit suffix for display, empty when dimensionless.
    pub fn unit(&self) -> &'static str {
        match self {
            Descriptor::MolecularWeight => " g/mol",
            Descriptor::Tpsa => " Å²",
            _ => "",
        }
    }

    /// Counts render as integers, continuous values with two decimals.
    pub fn is_count(&self) -> bool {
        matches!(
            self,
            Descriptor::RotatableBonds
                | Descriptor::HBondDonors
                | Descriptor::HBondAcceptors
                | Descriptor::HeavyAtoms
                | Descriptor::Rings
        )
    }
}

// ── Adapter trait ──────────────────────────────────────────────────────────

/// Synchronous cheminformatics capabilities.
///
/// Implementations are pure CPU work; async callers run them under
/// `spawn_blocking` when latency matters.
pub trait ToolkitAdapter: Send + Sync {
    /// Parse chemical notation into a molecular graph.
    fn parse(&self, notation: &str) -> Result<Molecule>;

    /// Copy of the graph with implicit hydrogens made explicit.
    fn add_hydrogens(&self, mol: &Molecule) -> Molecule;

    /// Assign deterministic 3D coordinates in place.
    fn embed_3d(&self, mol: &mut Molecule, seed: u64) -> Result<()>;

    /// Refine coordinates in place, reporting convergence.
    fn optimize_geometry(&self, mol: &mut Molecule, max_iterations: usize) -> OptimizeOutcome;

    /// Scalar descriptor value for the graph.
    fn descriptor(&self, mol: &Molecule, descriptor: Descriptor) -> f64;

    /// Hill-ordered molecular formula.
    fn molecular_formula(&self, mol: &Molecule) -> String;

    /// Serialize the graph with coordinates for external rendering.
    fn serialize_graph(&self, mol: &Molecule, title: &str) -> String;
}

// ── Production adapter ─────────────────────────────────────────────────────

/// Adapter over the in-process `chemviz-chem` backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustToolkit;

impl RustToolkit {
    pub fn new() -> Self {
        RustToolkit
    }
}

impl ToolkitAdapter for RustToolkit {
    fn parse(&self, notation: &str) -> Result<Molecule> {
        Ok(smiles::parse_smiles(notation)?)
    }

    fn add_hydrogens(&self, mol: &Molecule) -> Molecule {
        hydrogens::add_explicit_hydrogens(mol)
    }

    fn embed_3d(&self, mol: &mut Molecule, seed: u64) -> Result<()> {
        embed::embed_molecule(mol, seed)?;
        Ok(())
    }

    fn optimize_geometry(&self, mol: &mut Molecule, max_iterations: usize) -> OptimizeOutcome {
        forcefield::optimize_geometry(mol, max_iterations)
    }

    fn descriptor(&self, mol: &Molecule, descriptor: Descriptor) -> f64 {
        match descriptor {
            Descriptor::MolecularWeight => descriptors::molecular_weight(mol),
            Descriptor::LogP => descriptors::crippen_logp(mol),
            Descriptor::Tpsa => descriptors::tpsa(mol),
            Descriptor::RotatableBonds => descriptors::rotatable_bonds(mol) as f64,
            Descriptor::HBondDonors => descriptors::hbond_donors(mol) as f64,
            Descriptor::HBondAcceptors => descriptors::hbond_acceptors(mol) as f64,
            Descriptor::HeavyAtoms => mol.heavy_atom_count() as f64,
            Descriptor::Rings => mol.ring_count() as f64,
        }
    }

    fn molecular_formula(&self, mol: &Molecule) -> String {
        descriptors::molecular_formula(mol)
    }

    fn serialize_graph(&self, mol: &Molecule, title: &str) -> String {
        molblock::to_molblock(mol, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_display_order_starts_with_weight_ends_with_rings() {
        assert_eq!(Descriptor::ALL[0].label(), "Molecular Weight");
        assert_eq!(Descriptor::ALL[7].label(), "Rings");
        assert_eq!(Descriptor::ALL.len(), 8);
    }

    #[test]
    fn test_counts_and_units() {
        assert!(Descriptor::HeavyAtoms.is_count());
        assert!(!Descriptor::LogP.is_count());
        assert_eq!(Descriptor::MolecularWeight.unit(), " g/mol");
        assert_eq!(Descriptor::Tpsa.unit(), " Å²");
        assert_eq!(Descriptor::RotatableBonds.unit(), "");
    }

    #[test]
    fn test_parse_failure_maps_to_invalid_notation() {
        let toolkit = RustToolkit::new();
        let err = toolkit.parse("not smiles").unwrap_err();
        assert!(matches!(err, CoreError::InvalidNotation(_)));
    }

    #[test]
    fn test_full_chain_on_ethanol() {
        let toolkit = RustToolkit::new();
        let parsed = toolkit.parse("CCO").unwrap();
        let mut mol = toolkit.add_hydrogens(&parsed);
        assert_eq!(mol.atom_count(), 9);

        toolkit.embed_3d(&mut mol, 42).unwrap();
        let outcome = toolkit.optimize_geometry(&mut mol, 200);
        assert!(outcome.iterations <= 200);

        assert!((toolkit.descriptor(&mol, Descriptor::MolecularWeight) - 46.069).abs() < 0.01);
        assert_eq!(toolkit.descriptor(&mol, Descriptor::HeavyAtoms), 3.0);
        assert_eq!(toolkit.descriptor(&mol, Descriptor::Rings), 0.0);
        assert_eq!(toolkit.molecular_formula(&mol), "C2H6O");

        let block = toolkit.serialize_graph(&mol, "ethanol");
        assert!(block.starts_with("ethanol\n"));
        assert!(block.ends_with("M  END\n"));
    }
}
