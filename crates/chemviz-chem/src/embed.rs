//! Deterministic 3D coordinate generation.
//!
//! Atoms are placed breadth-first from atom zero. Each new atom goes
//! on a sphere of ideal bond length around its parent, in whichever of
//! a fixed number of seeded candidate directions keeps it farthest
//! from everything already placed. The same seed always yields the
//! same geometry.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ChemError, Result};
use crate::molecule::{BondOrder, Molecule};

const CANDIDATE_DIRECTIONS: usize = 12;

/// Scale on the covalent-radius sum for each bond order.
fn order_factor(order: BondOrder) -> f64 {
    match order {
        BondOrder::Single => 1.0,
        BondOrder::Aromatic => 0.93,
        BondOrder::Double => 0.87,
        BondOrder::Triple => 0.78,
    }
}

/// Ideal length of a bond in angstroms.
pub fn ideal_bond_length(mol: &Molecule, bond_idx: usize) -> f64 {
    let bond = &mol.bonds[bond_idx];
    let r1 = mol.atoms[bond.atom1].element.covalent_radius();
    let r2 = mol.atoms[bond.atom2].element.covalent_radius();
    (r1 + r2) * order_factor(bond.order)
}

/// Assign 3D coordinates to every atom in place.
///
/// Fails on an empty molecule and on disconnected fragments, which
/// have no single embeddable frame.
pub fn embed_molecule(mol: &mut Molecule, seed: u64) -> Result<()> {
    if mol.is_empty() {
        return Err(ChemError::Embed("molecule has no atoms".into()));
    }
    if mol.connected_components() > 1 {
        return Err(ChemError::Embed(
            "molecule has disconnected fragments".into(),
        ));
    }

    let n = mol.atom_count();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut coords = vec![[0.0f64; 3]; n];
    let mut placed = vec![false; n];

    placed[0] = true;
    let mut queue = VecDeque::from([0usize]);

    while let Some(parent) = queue.pop_front() {
        for &(child, bond_idx) in &mol.adjacency[parent] {
            if placed[child] {
                continue;
            }
            let length = ideal_bond_length(mol, bond_idx);

            let mut best = coords[parent];
            let mut best_score = f64::NEG_INFINITY;
            for _ in 0..CANDIDATE_DIRECTIONS {
                let dir = random_unit(&mut rng);
                let candidate = [
                    coords[parent][0] + dir[0] * length,
                    coords[parent][1] + dir[1] * length,
                    coords[parent][2] + dir[2] * length,
                ];
                let score = (0..n)
                    .filter(|&i| placed[i] && i != parent)
                    .map(|i| distance(candidate, coords[i]))
                    .fold(f64::INFINITY, f64::min);
                if score > best_score {
                    best_score = score;
                    best = candidate;
                }
            }

            coords[child] = best;
            placed[child] = true;
            queue.push_back(child);
        }
    }

    for (atom, pos) in mol.atoms.iter_mut().zip(coords) {
        atom.position = pos;
    }
    Ok(())
}

fn random_unit(rng: &mut StdRng) -> [f64; 3] {
    let z: f64 = rng.gen_range(-1.0..1.0);
    let phi: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let r = (1.0 - z * z).sqrt();
    [r * phi.cos(), r * phi.sin(), z]
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrogens::add_explicit_hydrogens;
    use crate::smiles::parse_smiles;

    #[test]
    fn same_seed_reproduces_coordinates() {
        let mut first = add_explicit_hydrogens(&parse_smiles("CCO").unwrap());
        let mut second = first.clone();
        embed_molecule(&mut first, 42).unwrap();
        embed_molecule(&mut second, 42).unwrap();
        for (a, b) in first.atoms.iter().zip(&second.atoms) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut first = add_explicit_hydrogens(&parse_smiles("CCO").unwrap());
        let mut second = first.clone();
        embed_molecule(&mut first, 1).unwrap();
        embed_molecule(&mut second, 2).unwrap();
        let moved = first
            .atoms
            .iter()
            .zip(&second.atoms)
            .any(|(a, b)| a.position != b.position);
        assert!(moved);
    }

    #[test]
    fn bonded_atoms_sit_at_ideal_length() {
        let mut mol = parse_smiles("CC").unwrap();
        embed_molecule(&mut mol, 42).unwrap();
        let d = distance(mol.atoms[0].position, mol.atoms[1].position);
        let ideal = ideal_bond_length(&mol, 0);
        assert!((d - ideal).abs() < 1e-9);
        assert!((ideal - 1.54).abs() < 1e-9);
    }

    #[test]
    fn all_atoms_receive_distinct_positions() {
        let mut mol = add_explicit_hydrogens(&parse_smiles("c1ccccc1").unwrap());
        embed_molecule(&mut mol, 42).unwrap();
        for i in 0..mol.atom_count() {
            for j in (i + 1)..mol.atom_count() {
                assert!(distance(mol.atoms[i].position, mol.atoms[j].position) > 0.25);
            }
        }
    }

    #[test]
    fn empty_molecule_is_rejected() {
        let mut mol = Molecule::default();
        assert!(embed_molecule(&mut mol, 42).is_err());
    }

    #[test]
    fn disconnected_fragments_are_rejected() {
        let mut mol = parse_smiles("C.C").unwrap();
        let err = embed_molecule(&mut mol, 42).unwrap_err();
        assert!(matches!(err, ChemError::Embed(_)));
    }
}
