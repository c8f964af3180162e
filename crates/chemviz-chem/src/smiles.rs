//! SMILES string parser.
//!
//! Covers the organic subset, bracket atoms with charge and hydrogen
//! counts, branches, ring closures (including `%nn`), and aromatic
//! lowercase notation. Stereo markers are accepted and ignored.

use std::collections::BTreeMap;

use crate::element::Element;
use crate::error::{ChemError, Result};
use crate::molecule::{Atom, Bond, BondOrder, Molecule};

/// Parse a SMILES string into a [`Molecule`].
pub fn parse_smiles(input: &str) -> Result<Molecule> {
    let mut parser = SmilesParser::new(input);
    parser.run()?;
    parser.finish()
}

struct SmilesParser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Whether the atom's hydrogen count was written in a bracket.
    /// Such counts are kept verbatim instead of being derived.
    h_specified: Vec<bool>,
    /// ring_closures[label] = (atom index, bond symbol at the opening)
    ring_closures: BTreeMap<u16, (usize, Option<BondOrder>)>,
    /// Branch return points.
    stack: Vec<usize>,
    prev_atom: Option<usize>,
    pending_bond: Option<BondOrder>,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str) -> Self {
        SmilesParser {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            h_specified: Vec::new(),
            ring_closures: BTreeMap::new(),
            stack: Vec::new(),
            prev_atom: None,
            pending_bond: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn run(&mut self) -> Result<()> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let at = self.pos;
                    self.advance();
                    match self.prev_atom {
                        Some(prev) => self.stack.push(prev),
                        None => {
                            return Err(ChemError::parse("branch start before any atom", at));
                        }
                    }
                }
                b')' => {
                    let at = self.pos;
                    self.advance();
                    self.prev_atom = Some(
                        self.stack
                            .pop()
                            .ok_or_else(|| ChemError::parse("unmatched ')'", at))?,
                    );
                    self.pending_bond = None;
                }
                b'-' => {
                    self.advance();
                    self.pending_bond = Some(BondOrder::Single);
                }
                b'=' => {
                    self.advance();
                    self.pending_bond = Some(BondOrder::Double);
                }
                b'#' => {
                    self.advance();
                    self.pending_bond = Some(BondOrder::Triple);
                }
                b':' => {
                    self.advance();
                    self.pending_bond = Some(BondOrder::Aromatic);
                }
                b'/' | b'\\' => {
                    // cis/trans markers carry no constitutional information
                    self.advance();
                }
                b'%' => {
                    let at = self.pos;
                    self.advance();
                    let label = self.parse_two_digit_label(at)?;
                    self.handle_ring_closure(label, at)?;
                }
                b'[' => self.parse_bracket_atom()?,
                b'0'..=b'9' => {
                    let at = self.pos;
                    self.advance();
                    self.handle_ring_closure((ch - b'0') as u16, at)?;
                }
                b'.' => {
                    self.advance();
                    self.prev_atom = None;
                    self.pending_bond = None;
                }
                _ if is_organic_atom_start(ch) => self.parse_organic_atom()?,
                _ => {
                    return Err(ChemError::parse(
                        format!("unexpected character '{}'", ch as char),
                        self.pos,
                    ));
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Molecule> {
        if let Some(label) = self.ring_closures.keys().next() {
            return Err(ChemError::parse(
                format!("unmatched ring closure {label}"),
                self.input.len(),
            ));
        }
        if !self.stack.is_empty() {
            return Err(ChemError::parse(
                format!("{} unmatched '('", self.stack.len()),
                self.input.len(),
            ));
        }
        if self.atoms.is_empty() {
            return Err(ChemError::parse("no atoms in input", 0));
        }
        self.assign_implicit_hydrogens();
        Ok(Molecule::new(self.atoms, self.bonds))
    }

    fn parse_organic_atom(&mut self) -> Result<()> {
        let at = self.pos;
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Err(ChemError::parse("unexpected end of input", at)),
        };
        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        // Two-letter organic symbols are never aromatic.
        let symbol = match (upper, self.peek()) {
            (b'B', Some(b'r')) if !is_aromatic => {
                self.advance();
                "Br"
            }
            (b'C', Some(b'l')) if !is_aromatic => {
                self.advance();
                "Cl"
            }
            (b'S', Some(b'i')) if !is_aromatic => {
                self.advance();
                "Si"
            }
            (b'S', Some(b'e')) if !is_aromatic => {
                self.advance();
                "Se"
            }
            (b'B', _) => "B",
            (b'C', _) => "C",
            (b'N', _) => "N",
            (b'O', _) => "O",
            (b'P', _) => "P",
            (b'S', _) => "S",
            (b'F', _) => "F",
            (b'I', _) => "I",
            _ => {
                return Err(ChemError::parse(
                    format!("unknown atom '{}'", ch as char),
                    at,
                ));
            }
        };

        let element = Element::from_symbol(symbol)
            .ok_or_else(|| ChemError::parse(format!("unknown atom '{}'", ch as char), at))?;

        self.push_atom(element, is_aromatic, 0, 0, false)
    }

    fn parse_bracket_atom(&mut self) -> Result<()> {
        let open = self.pos;
        self.advance(); // '['

        // Isotope labels are accepted and dropped.
        self.skip_digits();

        let at = self.pos;
        let ch = self
            .advance()
            .ok_or_else(|| ChemError::parse("unterminated bracket atom", open))?;
        if !ch.is_ascii_alphabetic() {
            return Err(ChemError::parse(
                format!("expected element symbol, found '{}'", ch as char),
                at,
            ));
        }
        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        // Prefer a two-letter symbol when the next character completes one.
        let mut symbol = String::from(upper as char);
        if let Some(next) = self.peek() {
            if next.is_ascii_lowercase() {
                let mut two = symbol.clone();
                two.push(next as char);
                if Element::from_symbol(&two).is_some() {
                    self.advance();
                    symbol = two;
                }
            }
        }

        let element = Element::from_symbol(&symbol)
            .ok_or_else(|| ChemError::parse(format!("unknown element '{symbol}'"), at))?;
        if is_aromatic && !element.supports_aromatic() {
            return Err(ChemError::parse(
                format!("element {symbol} cannot be aromatic"),
                at,
            ));
        }

        // Chirality markers carry no constitutional information.
        while self.peek() == Some(b'@') {
            self.advance();
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.advance();
            hydrogens = match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.advance();
                    d - b'0'
                }
                _ => 1,
            };
        }

        let charge = self.parse_charge();

        let at = self.pos;
        if self.advance() != Some(b']') {
            return Err(ChemError::parse("expected ']'", at));
        }

        self.push_atom(element, is_aromatic, charge, hydrogens, true)
    }

    /// `+`/`-` with an optional digit, or repeated signs (`++`, `--`).
    fn parse_charge(&mut self) -> i8 {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return 0,
        };
        self.advance();
        let mut magnitude = 1i8;
        match self.peek() {
            Some(d) if d.is_ascii_digit() => {
                self.advance();
                magnitude = (d - b'0') as i8;
            }
            _ => {
                let repeat = if sign > 0 { b'+' } else { b'-' };
                while self.peek() == Some(repeat) {
                    self.advance();
                    magnitude += 1;
                }
            }
        }
        sign * magnitude
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
            self.advance();
        }
    }

    fn parse_two_digit_label(&mut self, at: usize) -> Result<u16> {
        let d1 = self
            .advance()
            .ok_or_else(|| ChemError::parse("expected two digits after '%'", at))?;
        let d2 = self
            .advance()
            .ok_or_else(|| ChemError::parse("expected two digits after '%'", at))?;
        if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
            return Err(ChemError::parse("expected two digits after '%'", at));
        }
        Ok((d1 - b'0') as u16 * 10 + (d2 - b'0') as u16)
    }

    fn handle_ring_closure(&mut self, label: u16, at: usize) -> Result<()> {
        let current = self
            .prev_atom
            .ok_or_else(|| ChemError::parse("ring closure before any atom", at))?;

        match self.ring_closures.remove(&label) {
            Some((open_atom, open_bond)) => {
                if open_atom == current {
                    return Err(ChemError::parse(
                        format!("ring closure {label} bonds an atom to itself"),
                        at,
                    ));
                }
                if self.bond_exists(open_atom, current) {
                    return Err(ChemError::parse(
                        format!("ring closure {label} duplicates an existing bond"),
                        at,
                    ));
                }
                let order = match self.pending_bond.take().or(open_bond) {
                    Some(order) => order,
                    None if self.atoms[open_atom].is_aromatic
                        && self.atoms[current].is_aromatic =>
                    {
                        BondOrder::Aromatic
                    }
                    None => BondOrder::Single,
                };
                self.bonds.push(Bond { atom1: open_atom, atom2: current, order });
            }
            None => {
                self.ring_closures.insert(label, (current, self.pending_bond.take()));
            }
        }
        Ok(())
    }

    fn bond_exists(&self, a: usize, b: usize) -> bool {
        self.bonds
            .iter()
            .any(|bond| (bond.atom1 == a && bond.atom2 == b) || (bond.atom1 == b && bond.atom2 == a))
    }

    fn push_atom(
        &mut self,
        element: Element,
        is_aromatic: bool,
        formal_charge: i8,
        hydrogens: u8,
        from_bracket: bool,
    ) -> Result<()> {
        let mut atom = Atom::new(element);
        atom.is_aromatic = is_aromatic;
        atom.formal_charge = formal_charge;
        atom.implicit_hydrogens = hydrogens;

        let atom_idx = self.atoms.len();
        self.atoms.push(atom);
        self.h_specified.push(from_bracket);

        if let Some(prev) = self.prev_atom {
            let both_aromatic = self.atoms[prev].is_aromatic && self.atoms[atom_idx].is_aromatic;
            let order = self.pending_bond.take().unwrap_or(if both_aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            });
            self.bonds.push(Bond { atom1: prev, atom2: atom_idx, order });
        }
        self.pending_bond = None;
        self.prev_atom = Some(atom_idx);
        Ok(())
    }

    /// Fill hydrogen counts for organic-subset atoms from default
    /// valences. Bracket atoms keep whatever count they declared.
    fn assign_implicit_hydrogens(&mut self) {
        let degree = |bonds: &[Bond], i: usize| {
            bonds.iter().filter(|b| b.atom1 == i || b.atom2 == i).count()
        };
        let order_sum = |bonds: &[Bond], i: usize| {
            let v: f64 = bonds
                .iter()
                .filter(|b| b.atom1 == i || b.atom2 == i)
                .map(|b| b.order.as_f64())
                .sum();
            v.round() as usize
        };

        for i in 0..self.atoms.len() {
            if self.h_specified[i] {
                continue;
            }
            let target = self.atoms[i].element.default_valence() as usize;
            // One valence electron of an aromatic atom sits in the pi
            // system, so only target-1 sigma slots remain.
            let (available, used) = if self.atoms[i].is_aromatic {
                (target.saturating_sub(1), degree(&self.bonds, i))
            } else {
                (target, order_sum(&self.bonds, i))
            };
            self.atoms[i].implicit_hydrogens = available.saturating_sub(used) as u8;
        }
    }
}

fn is_organic_atom_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I'
            | b'b' | b'c' | b'n' | b'o' | b'p' | b's'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methane() {
        let mol = parse_smiles("C").unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(mol.atoms[0].element, Element::C);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);
    }

    #[test]
    fn ethanol_hydrogen_counts() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 3);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 2);
        assert_eq!(mol.atoms[2].implicit_hydrogens, 1);
    }

    #[test]
    fn benzene_is_aromatic() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        for atom in &mol.atoms {
            assert!(atom.is_aromatic);
            assert_eq!(atom.implicit_hydrogens, 1);
        }
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert_eq!(mol.ring_count(), 1);
    }

    #[test]
    fn branching() {
        let mol = parse_smiles("CC(C)C").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.degree(1), 3);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 1);
    }

    #[test]
    fn multiple_bonds() {
        let ethene = parse_smiles("C=C").unwrap();
        assert_eq!(ethene.bonds[0].order, BondOrder::Double);
        assert_eq!(ethene.atoms[0].implicit_hydrogens, 2);

        let nitrile = parse_smiles("C#N").unwrap();
        assert_eq!(nitrile.bonds[0].order, BondOrder::Triple);
        assert_eq!(nitrile.atoms[0].implicit_hydrogens, 1);
        assert_eq!(nitrile.atoms[1].implicit_hydrogens, 0);
    }

    #[test]
    fn bracket_atom_charge_and_hydrogens() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(mol.atoms[0].element, Element::N);
        assert_eq!(mol.atoms[0].formal_charge, 1);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);

        let anion = parse_smiles("[O-]").unwrap();
        assert_eq!(anion.atoms[0].formal_charge, -1);
        assert_eq!(anion.atoms[0].implicit_hydrogens, 0);
    }

    #[test]
    fn bracket_hydrogen_count_is_kept_verbatim() {
        // A neutral carbene has its written count, not the derived one.
        let mol = parse_smiles("[CH2]").unwrap();
        assert_eq!(mol.atoms[0].implicit_hydrogens, 2);

        let bare = parse_smiles("[C]").unwrap();
        assert_eq!(bare.atoms[0].implicit_hydrogens, 0);
    }

    #[test]
    fn aromatic_nitrogen_hydrogens() {
        // Pyridine nitrogen carries no hydrogen
        let pyridine = parse_smiles("c1ccncc1").unwrap();
        let n = pyridine.atoms.iter().find(|a| a.element == Element::N).unwrap();
        assert_eq!(n.implicit_hydrogens, 0);

        // Pyrrole nitrogen declares its hydrogen in brackets
        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        let n = pyrrole.atoms.iter().find(|a| a.element == Element::N).unwrap();
        assert_eq!(n.implicit_hydrogens, 1);
    }

    #[test]
    fn two_letter_organic_symbols() {
        let mol = parse_smiles("CCl").unwrap();
        assert_eq!(mol.atoms[1].element, Element::Cl);
        let mol = parse_smiles("CBr").unwrap();
        assert_eq!(mol.atoms[1].element, Element::Br);
    }

    #[test]
    fn two_digit_ring_closure() {
        let mol = parse_smiles("C%10CCCCCCCCC%10").unwrap();
        assert_eq!(mol.atom_count(), 10);
        assert_eq!(mol.bond_count(), 10);
        assert_eq!(mol.ring_count(), 1);
    }

    #[test]
    fn ring_closure_bond_order() {
        // Order written at the opening digit applies to the closure bond.
        let mol = parse_smiles("C=1CCCCC=1").unwrap();
        let closure = mol.bonds.last().unwrap();
        assert_eq!(closure.order, BondOrder::Double);
    }

    #[test]
    fn dot_separates_fragments() {
        let mol = parse_smiles("C.C").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(mol.connected_components(), 2);
    }

    #[test]
    fn aspirin() {
        let mol = parse_smiles("CC(=O)OC1=CC=CC=C1C(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 13);
        assert_eq!(mol.bond_count(), 13);
        assert_eq!(mol.ring_count(), 1);
        assert_eq!(mol.total_hydrogen_count(), 8);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_smiles("").is_err());
        assert!(parse_smiles(".").is_err());
        assert!(parse_smiles("C(").is_err());
        assert!(parse_smiles("C)").is_err());
        assert!(parse_smiles("(C)").is_err());
        assert!(parse_smiles("C1CC").is_err());
        assert!(parse_smiles("[").is_err());
        assert!(parse_smiles("[Xx]").is_err());
        assert!(parse_smiles("asdkjasd").is_err());
        assert!(parse_smiles("C11").is_err());
        assert!(parse_smiles("C1C1").is_err());
    }

    #[test]
    fn parse_error_reports_position() {
        let err = parse_smiles("CC?C").unwrap_err();
        match err {
            ChemError::Parse { position, .. } => assert_eq!(position, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stereo_markers_are_ignored() {
        let mol = parse_smiles("C/C=C/C").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bonds[1].order, BondOrder::Double);

        let chiral = parse_smiles("C[C@H](N)C(=O)O").unwrap();
        assert_eq!(chiral.atom_count(), 6);
        assert_eq!(chiral.atoms[1].implicit_hydrogens, 1);
    }
}
