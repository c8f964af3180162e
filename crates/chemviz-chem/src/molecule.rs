//! Molecular graph representation.

use std::collections::VecDeque;

use crate::element::Element;

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric order for valence arithmetic.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// CTfile bond type code for the V2000 bond block.
    pub fn ctfile_code(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 4,
        }
    }
}

/// An atom: element, parse state, and (once embedded) a 3D position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub position: [f64; 3],
    pub formal_charge: i8,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Atom {
            element,
            position: [0.0; 3],
            formal_charge: 0,
            is_aromatic: false,
            implicit_hydrogens: 0,
        }
    }
}

/// A bond between two atoms, by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

/// A molecular graph with adjacency information.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom] = (neighbor atom index, bond index)
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Build a molecule, deriving the adjacency list from atoms and bonds.
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        Molecule { atoms, bonds, adjacency }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Number of non-hydrogen atoms.
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.element != Element::H).count()
    }

    /// Graph degree of an atom (number of explicit bonds).
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Degree counting only non-hydrogen neighbors.
    pub fn heavy_degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx]
            .iter()
            .filter(|&&(n, _)| self.atoms[n].element != Element::H)
            .count()
    }

    pub fn neighbors(&self, atom_idx: usize) -> Vec<usize> {
        self.adjacency[atom_idx].iter().map(|&(n, _)| n).collect()
    }

    /// Hydrogens attached to an atom: its implicit count plus any explicit
    /// H neighbors. Consistent before and after hydrogen expansion.
    pub fn attached_hydrogens(&self, atom_idx: usize) -> usize {
        let explicit = self.adjacency[atom_idx]
            .iter()
            .filter(|&&(n, _)| self.atoms[n].element == Element::H)
            .count();
        explicit + self.atoms[atom_idx].implicit_hydrogens as usize
    }

    /// Total hydrogen count over the whole graph (implicit + explicit).
    pub fn total_hydrogen_count(&self) -> usize {
        let explicit = self.atoms.iter().filter(|a| a.element == Element::H).count();
        let implicit: usize = self.atoms.iter().map(|a| a.implicit_hydrogens as usize).sum();
        explicit + implicit
    }

    /// Whether any bond at the atom has the given order.
    pub fn has_bond_of_order(&self, atom_idx: usize, order: BondOrder) -> bool {
        self.adjacency[atom_idx].iter().any(|&(_, bi)| self.bonds[bi].order == order)
    }

    /// Number of connected components.
    pub fn connected_components(&self) -> usize {
        let n = self.atom_count();
        let mut visited = vec![false; n];
        let mut count = 0;
        for start in 0..n {
            if visited[start] {
                continue;
            }
            count += 1;
            let mut queue = VecDeque::new();
            queue.push_back(start);
            visited[start] = true;
            while let Some(curr) = queue.pop_front() {
                for &(neighbor, _) in &self.adjacency[curr] {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        count
    }

    /// Per-bond ring membership: a bond is in a ring iff it is not a
    /// bridge. Bridges found with one DFS over disc/low values.
    pub fn ring_bonds(&self) -> Vec<bool> {
        let n = self.atom_count();
        let mut in_ring = vec![true; self.bond_count()];
        let mut disc = vec![usize::MAX; n];
        let mut low = vec![0usize; n];
        let mut timer = 0usize;

        // Iterative DFS; (atom, incoming bond, neighbor cursor) frames.
        let mut stack: Vec<(usize, Option<usize>, usize)> = Vec::new();
        for root in 0..n {
            if disc[root] != usize::MAX {
                continue;
            }
            disc[root] = timer;
            low[root] = timer;
            timer += 1;
            stack.push((root, None, 0));

            while let Some(frame) = stack.last_mut() {
                let (u, in_bond) = (frame.0, frame.1);
                if frame.2 < self.adjacency[u].len() {
                    let (v, bi) = self.adjacency[u][frame.2];
                    frame.2 += 1;
                    if Some(bi) == in_bond {
                        continue;
                    }
                    if disc[v] == usize::MAX {
                        disc[v] = timer;
                        low[v] = timer;
                        timer += 1;
                        stack.push((v, Some(bi), 0));
                    } else {
                        low[u] = low[u].min(disc[v]);
                    }
                } else {
                    stack.pop();
                    if let Some(&(parent, _, _)) = stack.last() {
                        low[parent] = low[parent].min(low[u]);
                        if let Some(bi) = in_bond {
                            if low[u] > disc[parent] {
                                in_ring[bi] = false;
                            }
                        }
                    }
                }
            }
        }
        in_ring
    }

    /// Per-atom ring membership derived from ring bonds.
    pub fn ring_atoms(&self) -> Vec<bool> {
        let ring_bonds = self.ring_bonds();
        let mut member = vec![false; self.atom_count()];
        for (bi, bond) in self.bonds.iter().enumerate() {
            if ring_bonds[bi] {
                member[bond.atom1] = true;
                member[bond.atom2] = true;
            }
        }
        member
    }

    /// Ring count as the cyclomatic number: bonds - atoms + components.
    pub fn ring_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let cycles =
            self.bond_count() as isize - self.atom_count() as isize + self.connected_components() as isize;
        cycles.max(0) as usize
    }
}
