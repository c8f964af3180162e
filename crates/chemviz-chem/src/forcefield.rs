//! Geometry refinement with a distance-spring force field.
//!
//! Every term is a pairwise spring: bonds pull toward their ideal
//! length, 1-3 pairs toward the separation implied by the central
//! atom's ideal angle, and non-bonded pairs repel softly below a
//! contact distance. Minimization is steepest descent with an
//! adaptive step. It refines the geometry it is given and never
//! fails; a run that stops short of the gradient tolerance reports
//! `converged: false` and keeps the best coordinates found.

use std::collections::BTreeMap;

use crate::embed::ideal_bond_length;
use crate::molecule::{BondOrder, Molecule};

const K_BOND: f64 = 300.0;
const K_ANGLE: f64 = 60.0;
const K_REPULSION: f64 = 25.0;
const REPULSION_SCALE: f64 = 1.8;
const GRADIENT_TOLERANCE: f64 = 1e-3;
const INITIAL_STEP: f64 = 0.05;
const MAX_STEP: f64 = 0.3;
const MIN_STEP: f64 = 1e-6;

/// Result of a minimization run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizeOutcome {
    pub converged: bool,
    pub iterations: usize,
    pub rms_gradient: f64,
}

struct Spring {
    i: usize,
    j: usize,
    r0: f64,
    k: f64,
}

/// One-sided spring active only below `r_min`.
struct Repulsion {
    i: usize,
    j: usize,
    r_min: f64,
}

/// Minimize the molecule's geometry in place.
pub fn optimize_geometry(mol: &mut Molecule, max_iterations: usize) -> OptimizeOutcome {
    let n = mol.atom_count();
    if n < 2 {
        return OptimizeOutcome { converged: true, iterations: 0, rms_gradient: 0.0 };
    }

    let springs = build_springs(mol);
    let repulsions = build_repulsions(mol);
    let mut coords: Vec<[f64; 3]> = mol.atoms.iter().map(|a| a.position).collect();

    let mut energy = total_energy(&coords, &springs, &repulsions);
    let mut step = INITIAL_STEP;
    let mut iterations = 0;
    let mut rms = 0.0;
    let mut converged = false;

    while iterations < max_iterations {
        let grad = gradient(&coords, &springs, &repulsions);
        rms = rms_gradient(&grad);
        if rms < GRADIENT_TOLERANCE {
            converged = true;
            break;
        }

        // Normalize so the largest per-atom move equals the step size.
        let max_norm = grad
            .iter()
            .map(|g| (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt())
            .fold(0.0, f64::max);
        if max_norm == 0.0 {
            converged = true;
            break;
        }
        let scale = step / max_norm;
        let trial: Vec<[f64; 3]> = coords
            .iter()
            .zip(&grad)
            .map(|(c, g)| [c[0] - g[0] * scale, c[1] - g[1] * scale, c[2] - g[2] * scale])
            .collect();

        let trial_energy = total_energy(&trial, &springs, &repulsions);
        if trial_energy < energy {
            coords = trial;
            energy = trial_energy;
            step = (step * 1.2).min(MAX_STEP);
        } else {
            step *= 0.5;
            if step < MIN_STEP {
                break;
            }
        }
        iterations += 1;
    }

    for (atom, pos) in mol.atoms.iter_mut().zip(coords) {
        atom.position = pos;
    }
    OptimizeOutcome { converged, iterations, rms_gradient: rms }
}

/// Total force-field energy of the molecule's current coordinates.
pub fn molecule_energy(mol: &Molecule) -> f64 {
    let coords: Vec<[f64; 3]> = mol.atoms.iter().map(|a| a.position).collect();
    total_energy(&coords, &build_springs(mol), &build_repulsions(mol))
}

fn build_springs(mol: &Molecule) -> Vec<Spring> {
    let mut springs: BTreeMap<(usize, usize), Spring> = BTreeMap::new();

    for (bi, bond) in mol.bonds.iter().enumerate() {
        let key = ordered(bond.atom1, bond.atom2);
        springs.insert(
            key,
            Spring { i: key.0, j: key.1, r0: ideal_bond_length(mol, bi), k: K_BOND },
        );
    }

    // 1-3 springs from the law of cosines around each center.
    for center in 0..mol.atom_count() {
        let theta = ideal_angle(mol, center);
        let arms = &mol.adjacency[center];
        for a in 0..arms.len() {
            for b in (a + 1)..arms.len() {
                let (ai, a_bond) = arms[a];
                let (bi, b_bond) = arms[b];
                let key = ordered(ai, bi);
                if springs.contains_key(&key) {
                    continue;
                }
                let r1 = ideal_bond_length(mol, a_bond);
                let r2 = ideal_bond_length(mol, b_bond);
                let r0 = (r1 * r1 + r2 * r2 - 2.0 * r1 * r2 * theta.cos()).sqrt();
                springs.insert(key, Spring { i: key.0, j: key.1, r0, k: K_ANGLE });
            }
        }
    }

    springs.into_values().collect()
}

fn build_repulsions(mol: &Molecule) -> Vec<Repulsion> {
    let n = mol.atom_count();
    let mut excluded: Vec<(usize, usize)> = Vec::new();
    for bond in &mol.bonds {
        excluded.push(ordered(bond.atom1, bond.atom2));
    }
    for center in 0..n {
        let arms = &mol.adjacency[center];
        for a in 0..arms.len() {
            for b in (a + 1)..arms.len() {
                excluded.push(ordered(arms[a].0, arms[b].0));
            }
        }
    }
    excluded.sort_unstable();
    excluded.dedup();

    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if excluded.binary_search(&(i, j)).is_ok() {
                continue;
            }
            let r_min = REPULSION_SCALE
                * (mol.atoms[i].element.covalent_radius()
                    + mol.atoms[j].element.covalent_radius());
            pairs.push(Repulsion { i, j, r_min });
        }
    }
    pairs
}

/// Ideal bond angle at a center, from its bonding pattern.
fn ideal_angle(mol: &Molecule, center: usize) -> f64 {
    if mol.atoms[center].is_aromatic {
        return 120.0_f64.to_radians();
    }
    let mut doubles = 0;
    let mut triples = 0;
    for &(_, bi) in &mol.adjacency[center] {
        match mol.bonds[bi].order {
            BondOrder::Double => doubles += 1,
            BondOrder::Triple => triples += 1,
            _ => {}
        }
    }
    if triples > 0 || doubles >= 2 {
        180.0_f64.to_radians()
    } else if doubles == 1 {
        120.0_f64.to_radians()
    } else {
        // tetrahedral
        109.47_f64.to_radians()
    }
}

fn total_energy(coords: &[[f64; 3]], springs: &[Spring], repulsions: &[Repulsion]) -> f64 {
    let mut energy = 0.0;
    for s in springs {
        let d = distance(coords[s.i], coords[s.j]) - s.r0;
        energy += s.k * d * d;
    }
    for r in repulsions {
        let d = distance(coords[r.i], coords[r.j]);
        if d < r.r_min {
            let overlap = r.r_min - d;
            energy += K_REPULSION * overlap * overlap;
        }
    }
    energy
}

fn gradient(coords: &[[f64; 3]], springs: &[Spring], repulsions: &[Repulsion]) -> Vec<[f64; 3]> {
    let mut grad = vec![[0.0f64; 3]; coords.len()];
    for s in springs {
        add_pair_gradient(coords, &mut grad, s.i, s.j, |r| 2.0 * s.k * (r - s.r0));
    }
    for r in repulsions {
        let d = distance(coords[r.i], coords[r.j]);
        if d < r.r_min {
            add_pair_gradient(coords, &mut grad, r.i, r.j, |rr| {
                -2.0 * K_REPULSION * (r.r_min - rr)
            });
        }
    }
    grad
}

/// Add dE/dr along the pair axis to both endpoint gradients.
fn add_pair_gradient<F: Fn(f64) -> f64>(
    coords: &[[f64; 3]],
    grad: &mut [[f64; 3]],
    i: usize,
    j: usize,
    de_dr: F,
) {
    let r = distance(coords[i], coords[j]).max(1e-12);
    let f = de_dr(r) / r;
    for axis in 0..3 {
        let delta = coords[i][axis] - coords[j][axis];
        grad[i][axis] += f * delta;
        grad[j][axis] -= f * delta;
    }
}

fn rms_gradient(grad: &[[f64; 3]]) -> f64 {
    let sum: f64 = grad
        .iter()
        .map(|g| g[0] * g[0] + g[1] * g[1] + g[2] * g[2])
        .sum();
    (sum / (grad.len() as f64 * 3.0)).sqrt()
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
