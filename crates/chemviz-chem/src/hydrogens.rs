//! Conversion of implicit hydrogen counts into explicit atoms.

use crate::element::Element;
use crate::molecule::{Atom, Bond, BondOrder, Molecule};

/// Return a copy of the molecule with every implicit hydrogen turned
/// into an explicit `H` atom bonded to its heavy atom. Implicit counts
/// on the result are zero, so descriptor and hydrogen-count queries
/// read the same before and after.
pub fn add_explicit_hydrogens(mol: &Molecule) -> Molecule {
    let mut atoms = mol.atoms.clone();
    let mut bonds = mol.bonds.clone();

    for idx in 0..mol.atoms.len() {
        let count = atoms[idx].implicit_hydrogens;
        atoms[idx].implicit_hydrogens = 0;
        for _ in 0..count {
            let h_idx = atoms.len();
            atoms.push(Atom::new(Element::H));
            bonds.push(Bond { atom1: idx, atom2: h_idx, order: BondOrder::Single });
        }
    }

    Molecule::new(atoms, bonds)
}
