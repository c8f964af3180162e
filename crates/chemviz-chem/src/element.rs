//! Element data for the supported SMILES subset.
//!
//! Weights are standard atomic weights, radii are covalent radii in
//! ångströms, colors are the CPK hex values molecular viewers expect.

/// Elements the parser and descriptors understand. The organic subset plus
/// the bracket-atom elements that show up in drug-like molecules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Si,
    P,
    S,
    Cl,
    Se,
    Br,
    I,
}

impl Element {
    pub fn from_symbol(symbol: &str) -> Option<Element> {
        match symbol {
            "H"  => Some(Element::H),
            "B"  => Some(Element::B),
            "C"  => Some(Element::C),
            "N"  => Some(Element::N),
            "O"  => Some(Element::O),
            "F"  => Some(Element::F),
            "Si" => Some(Element::Si),
            "P"  => Some(Element::P),
            "S"  => Some(Element::S),
            "Cl" => Some(Element::Cl),
            "Se" => Some(Element::Se),
            "Br" => Some(Element::Br),
            "I"  => Some(Element::I),
            _    => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H  => "H",
            Element::B  => "B",
            Element::C  => "C",
            Element::N  => "N",
            Element::O  => "O",
            Element::F  => "F",
            Element::Si => "Si",
            Element::P  => "P",
            Element::S  => "S",
            Element::Cl => "Cl",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I  => "I",
        }
    }

    pub fn atomic_weight(self) -> f64 {
        match self {
            Element::H  => 1.008,
            Element::B  => 10.811,
            Element::C  => 12.011,
            Element::N  => 14.007,
            Element::O  => 15.999,
            Element::F  => 18.998,
            Element::Si => 28.086,
            Element::P  => 30.974,
            Element::S  => 32.06,
            Element::Cl => 35.453,
            Element::Se => 78.971,
            Element::Br => 79.904,
            Element::I  => 126.904,
        }
    }

    /// Default valence used to assign implicit hydrogens during parsing.
    pub fn default_valence(self) -> u8 {
        match self {
            Element::H  => 1,
            Element::B  => 3,
            Element::C  => 4,
            Element::N  => 3,
            Element::O  => 2,
            Element::F  => 1,
            Element::Si => 4,
            Element::P  => 3,
            Element::S  => 2,
            Element::Cl => 1,
            Element::Se => 2,
            Element::Br => 1,
            Element::I  => 1,
        }
    }

    /// Whether the element has a lowercase aromatic form in SMILES.
    pub fn supports_aromatic(self) -> bool {
        matches!(
            self,
            Element::B | Element::C | Element::N | Element::O | Element::P | Element::S | Element::Se
        )
    }

    /// Covalent radius in Å, used for bond-length estimates.
    pub fn covalent_radius(self) -> f64 {
        match self {
            Element::H  => 0.37,
            Element::B  => 0.82,
            Element::C  => 0.77,
            Element::N  => 0.75,
            Element::O  => 0.73,
            Element::F  => 0.71,
            Element::Si => 1.11,
            Element::P  => 1.06,
            Element::S  => 1.02,
            Element::Cl => 0.99,
            Element::Se => 1.16,
            Element::Br => 1.14,
            Element::I  => 1.33,
        }
    }

    /// CPK display color as a hex string.
    pub fn cpk_color(self) -> &'static str {
        match self {
            Element::H  => "#FFFFFF",
            Element::B  => "#FFB5B5",
            Element::C  => "#909090",
            Element::N  => "#3050F8",
            Element::O  => "#FF0D0D",
            Element::F  => "#90E050",
            Element::Si => "#F0C8A0",
            Element::P  => "#FF8000",
            Element::S  => "#FFFF30",
            Element::Cl => "#1FF01F",
            Element::Br => "#A62929",
            Element::I  => "#940094",
            // No conventional CPK assignment
            Element::Se => "#FF1493",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_round_trip() {
        for elem in [
            Element::H,
            Element::B,
            Element::C,
            Element::N,
            Element::O,
            Element::F,
            Element::Si,
            Element::P,
            Element::S,
            Element::Cl,
            Element::Se,
            Element::Br,
            Element::I,
        ] {
            assert_eq!(Element::from_symbol(elem.symbol()), Some(elem));
        }
        assert_eq!(Element::from_symbol("Xx"), None);
        assert_eq!(Element::from_symbol(""), None);
    }

    #[test]
    fn carbon_valence_and_weight() {
        assert_eq!(Element::C.default_valence(), 4);
        assert!((Element::C.atomic_weight() - 12.011).abs() < 1e-9);
    }

    #[test]
    fn halogens_are_monovalent_and_not_aromatic() {
        for elem in [Element::F, Element::Cl, Element::Br, Element::I] {
            assert_eq!(elem.default_valence(), 1);
            assert!(!elem.supports_aromatic());
        }
    }

    #[test]
    fn cpk_colors() {
        assert_eq!(Element::O.cpk_color(), "#FF0D0D");
        assert_eq!(Element::H.cpk_color(), "#FFFFFF");
        assert_eq!(Element::N.cpk_color(), "#3050F8");
    }
}
