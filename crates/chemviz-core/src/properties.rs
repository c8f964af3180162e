//! Descriptor set computation and display formatting.

use std::sync::Arc;

use chemviz_chem::Molecule;
use serde::Serialize;

use crate::toolkit::{Descriptor, ToolkitAdapter};

/// One computed descriptor with its formatted rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyEntry {
    pub label: String,
    pub value: f64,
    pub display: String,
}

/// Ordered descriptor values for one molecule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertySet {
    entries: Vec<PropertyEntry>,
}

impl PropertySet {
    pub fn entries(&self) -> &[PropertyEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, label: &str) -> Option<&PropertyEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }
}

/// Computes the fixed descriptor set through the toolkit seam.
#[derive(Clone)]
pub struct PropertyCalculator {
    toolkit: Arc<dyn ToolkitAdapter>,
}

impl PropertyCalculator {
    pub fn new(toolkit: Arc<dyn ToolkitAdapter>) -> Self {
        PropertyCalculator { toolkit }
    }

    /// All descriptors for the graph, empty when there is no molecule.
    pub fn compute(&self, graph: Option<&Molecule>) -> PropertySet {
        let mol = match graph {
            Some(mol) if !mol.is_empty() => mol,
            _ => return PropertySet::default(),
        };
        let entries = Descriptor::ALL
            .iter()
            .map(|&descriptor| {
                let value = self.toolkit.descriptor(mol, descriptor);
                PropertyEntry {
                    label: descriptor.label().to_string(),
                    value,
                    display: format_descriptor(descriptor, value),
                }
            })
            .collect();
        PropertySet { entries }
    }
}

fn format_descriptor(descriptor: Descriptor, value: f64) -> String {
    if descriptor.is_count() {
        format!("{}{}", value as i64, descriptor.unit())
    } else {
        format!("{:.2}{}", value, descriptor.unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::RustToolkit;

    fn calculator() -> PropertyCalculator {
        PropertyCalculator::new(Arc::new(RustToolkit::new()))
    }

    #[test]
    fn test_no_molecule_yields_empty_set() {
        let set = calculator().compute(None);
        assert!(set.is_empty());
        assert_eq!(serde_json::to_value(&set).unwrap(), serde_json::json!([]));
    }

    #[test]
    fn test_ethanol_property_set() {
        let toolkit = RustToolkit::new();
        let mol = toolkit.parse("CCO").unwrap();
        let set = calculator().compute(Some(&mol));

        assert_eq!(set.len(), 8);
        assert_eq!(set.entries()[0].label, "Molecular Weight");
        assert_eq!(set.get("Molecular Weight").unwrap().display, "46.07 g/mol");
        assert_eq!(set.get("TPSA").unwrap().display, "20.23 Å²");
        assert_eq!(set.get("H-Bond Donors").unwrap().display, "1");
        assert_eq!(set.get("Heavy Atoms").unwrap().display, "3");
        assert_eq!(set.get("Rings").unwrap().display, "0");
    }

    #[test]
    fn test_values_match_across_hydrogen_expansion() {
        let toolkit = RustToolkit::new();
        let sparse = toolkit.parse("c1ccccc1O").unwrap();
        let full = toolkit.add_hydrogens(&sparse);

        let before = calculator().compute(Some(&sparse));
        let after = calculator().compute(Some(&full));
        for (a, b) in before.entries().iter().zip(after.entries()) {
            assert_eq!(a.display, b.display, "{} drifted", a.label);
        }
    }

    #[test]
    fn test_negative_logp_formats_with_sign() {
        let toolkit = RustToolkit::new();
        let mol = toolkit.parse("O").unwrap();
        let set = calculator().compute(Some(&mol));
        let logp = set.get("LogP").unwrap();
        assert!(logp.value < 0.0);
        assert!(logp.display.starts_with('-'));
    }
}
