//! Graph-based molecular descriptors.
//!
//! TPSA follows Ertl's fragment contributions and logP the
//! Wildman-Crippen atom typing, both matched on heavy-atom degree and
//! attached hydrogen counts. That keeps every descriptor identical on
//! the implicit-hydrogen graph a parser produces and the explicit one
//! an embedding works on.

use std::collections::BTreeMap;

use crate::element::Element;
use crate::molecule::{BondOrder, Molecule};

/// Sum of atomic weights, counting implicit hydrogens.
pub fn molecular_weight(mol: &Molecule) -> f64 {
    mol.atoms
        .iter()
        .map(|a| {
            a.element.atomic_weight()
                + a.implicit_hydrogens as f64 * Element::H.atomic_weight()
        })
        .sum()
}

/// Molecular formula in Hill order: carbon, then hydrogen, then the
/// remaining elements alphabetically. Without carbon everything is
/// alphabetical.
pub fn molecular_formula(mol: &Molecule) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for atom in &mol.atoms {
        *counts.entry(atom.element.symbol()).or_insert(0) += 1;
    }
    let hydrogens = mol.total_hydrogen_count();
    counts.remove("H");
    if hydrogens > 0 {
        counts.insert("H", hydrogens);
    }

    let mut formula = String::new();
    let mut write = |symbol: &str, count: usize| {
        formula.push_str(symbol);
        if count > 1 {
            formula.push_str(&count.to_string());
        }
    };

    let carbon = counts.remove("C");
    if let Some(c) = carbon {
        write("C", c);
        if let Some(h) = counts.remove("H") {
            write("H", h);
        }
    }
    for (symbol, count) in counts {
        write(symbol, count);
    }
    formula
}

/// Count of N and O atoms carrying at least one hydrogen.
pub fn hbond_donors(mol: &Molecule) -> usize {
    (0..mol.atom_count())
        .filter(|&i| {
            matches!(mol.atoms[i].element, Element::N | Element::O)
                && mol.attached_hydrogens(i) > 0
        })
        .count()
}

/// Count of N and O atoms.
pub fn hbond_acceptors(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| matches!(a.element, Element::N | Element::O))
        .count()
}

/// Single non-ring bonds between two non-terminal heavy atoms,
/// excluding amide C-N bonds.
pub fn rotatable_bonds(mol: &Molecule) -> usize {
    let ring_bonds = mol.ring_bonds();
    mol.bonds
        .iter()
        .enumerate()
        .filter(|(bi, bond)| {
            bond.order == BondOrder::Single
                && !ring_bonds[*bi]
                && mol.atoms[bond.atom1].element != Element::H
                && mol.atoms[bond.atom2].element != Element::H
                && mol.heavy_degree(bond.atom1) > 1
                && mol.heavy_degree(bond.atom2) > 1
                && !is_amide_bond(mol, bond.atom1, bond.atom2)
        })
        .count()
}

/// C-N single bond where the carbon also carries a double-bonded O.
fn is_amide_bond(mol: &Molecule, a: usize, b: usize) -> bool {
    let carbon = match (mol.atoms[a].element, mol.atoms[b].element) {
        (Element::C, Element::N) => a,
        (Element::N, Element::C) => b,
        _ => return false,
    };
    mol.adjacency[carbon].iter().any(|&(n, bi)| {
        mol.atoms[n].element == Element::O && mol.bonds[bi].order == BondOrder::Double
    })
}

/// Topological polar surface area (Ertl fragment contributions).
pub fn tpsa(mol: &Molecule) -> f64 {
    (0..mol.atom_count()).map(|i| tpsa_contribution(mol, i)).sum()
}

fn tpsa_contribution(mol: &Molecule, idx: usize) -> f64 {
    let atom = &mol.atoms[idx];
    let heavy_degree = mol.heavy_degree(idx);
    let hydrogens = mol.attached_hydrogens(idx);
    let has_double = mol.has_bond_of_order(idx, BondOrder::Double);
    let has_triple = mol.has_bond_of_order(idx, BondOrder::Triple);

    match atom.element {
        Element::N => {
            if atom.formal_charge > 0 {
                return match hydrogens {
                    h if h >= 3 => 27.64,
                    2 => 25.59,
                    1 => 23.47,
                    _ => 0.0,
                };
            }
            if atom.is_aromatic {
                return if hydrogens >= 1 { 15.79 } else { 12.89 };
            }
            if has_triple && heavy_degree == 1 && hydrogens == 0 {
                // nitrile
                return 23.79;
            }
            match (heavy_degree, hydrogens, has_double) {
                (1, 2, _) => 26.02,
                (2, 1, false) => 19.15,
                (2, 1, true) => 23.85,
                (2, 0, true) => 12.36,
                (2, 0, false) => 19.15,
                (3, 0, _) => 3.24,
                _ => {
                    if hydrogens >= 2 {
                        26.02
                    } else if hydrogens == 1 {
                        19.15
                    } else {
                        3.24
                    }
                }
            }
        }
        Element::O => {
            if atom.formal_charge < 0 {
                return 23.06;
            }
            if atom.is_aromatic {
                return 13.14;
            }
            match (heavy_degree, hydrogens, has_double) {
                (1, 1, false) => 20.23,
                (1, 0, true) => 17.07,
                (2, 0, false) => 9.23,
                (1, 0, false) => 17.07,
                _ => {
                    if hydrogens >= 1 {
                        20.23
                    } else if has_double {
                        17.07
                    } else {
                        9.23
                    }
                }
            }
        }
        Element::S => {
            if hydrogens >= 1 {
                38.80
            } else if has_double || heavy_degree >= 2 {
                25.30
            } else {
                0.0
            }
        }
        Element::P => {
            if has_double {
                34.14
            } else if hydrogens >= 1 {
                23.47
            } else {
                9.81
            }
        }
        _ => 0.0,
    }
}

/// Wildman-Crippen octanol/water partition coefficient estimate.
pub fn crippen_logp(mol: &Molecule) -> f64 {
    let ring_atoms = mol.ring_atoms();
    let mut logp = 0.0;

    for idx in 0..mol.atom_count() {
        let atom = &mol.atoms[idx];
        if atom.element == Element::H {
            continue;
        }
        logp += crippen_atom_contribution(mol, idx, ring_atoms[idx]);

        // Hydrogen contributions keyed by the heavy atom they sit on.
        let h = mol.attached_hydrogens(idx) as f64;
        logp += if atom.element == Element::C {
            h * 0.1230
        } else {
            h * -0.2677
        };
    }
    logp
}

fn crippen_atom_contribution(mol: &Molecule, idx: usize, in_ring: bool) -> f64 {
    let atom = &mol.atoms[idx];
    let heavy_degree = mol.heavy_degree(idx);
    let has_double = mol.has_bond_of_order(idx, BondOrder::Double);
    let has_hetero_neighbor = mol.adjacency[idx]
        .iter()
        .any(|&(n, _)| !matches!(mol.atoms[n].element, Element::C | Element::H));

    match atom.element {
        Element::C => {
            if atom.is_aromatic {
                if has_hetero_neighbor {
                    -0.14
                } else {
                    0.296
                }
            } else if has_double {
                if has_hetero_neighbor {
                    -0.03
                } else {
                    0.08
                }
            } else if in_ring {
                0.1441
            } else {
                match heavy_degree {
                    0 | 1 | 2 => 0.1441,
                    3 => 0.0,
                    _ => -0.04,
                }
            }
        }
        Element::N => {
            if atom.is_aromatic {
                -0.3187
            } else if atom.formal_charge > 0 {
                -1.0190
            } else if has_double {
                -0.5262
            } else {
                -0.4458
            }
        }
        Element::O => {
            if atom.formal_charge < 0 {
                -1.189
            } else if has_double {
                -0.3339
            } else if heavy_degree >= 2 {
                -0.2893
            } else {
                -0.3567
            }
        }
        Element::F => 0.4118,
        Element::P => 0.2836,
        Element::S => {
            if has_double {
                -0.1084
            } else if atom.formal_charge != 0 {
                -0.5188
            } else {
                0.6237
            }
        }
        Element::Cl => 0.6895,
        Element::Br => 0.8813,
        Element::I => 1.050,
        _ => 0.0,
    }
}
