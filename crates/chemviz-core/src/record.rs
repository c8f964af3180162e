//! Resolved compound identity records.

use serde::{Deserialize, Serialize};

/// Which resolution stage produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Structure oracle answered with a verified notation.
    Oracle,
    /// Reference database lookup by name.
    Database,
    /// The input itself parsed as chemical notation.
    DirectParse,
    /// Every stage failed; the record carries only a description.
    Unresolved,
}

/// Resolved identity of a compound.
///
/// `description` is always populated. A `Some` smiles has already been
/// verified to parse by the stage that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemicalRecord {
    pub smiles: Option<String>,
    pub iupac_name: Option<String>,
    pub common_name: Option<String>,
    pub molecular_formula: Option<String>,
    pub description: String,
    pub pubchem_cid: Option<u64>,
    pub source: ResolutionSource,
}

impl ChemicalRecord {
    /// Record for input no stage could interpret.
    pub fn unresolved(description: impl Into<String>) -> Self {
        ChemicalRecord {
            smiles: None,
            iupac_name: None,
            common_name: None,
            molecular_formula: None,
            description: description.into(),
            pubchem_cid: None,
            source: ResolutionSource::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.smiles.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_record_has_no_structure() {
        let record = ChemicalRecord::unresolved("nothing matched");
        assert!(!record.is_resolved());
        assert_eq!(record.source, ResolutionSource::Unresolved);
        assert_eq!(record.description, "nothing matched");
        assert!(record.smiles.is_none());
        assert!(record.pubchem_cid.is_none());
    }

    #[test]
    fn test_source_serializes_snake_case() {
        let json = serde_json::to_value(ResolutionSource::DirectParse).unwrap();
        assert_eq!(json, serde_json::json!("direct_parse"));
        let json = serde_json::to_value(ResolutionSource::Oracle).unwrap();
        assert_eq!(json, serde_json::json!("oracle"));
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = ChemicalRecord {
            smiles: Some("CCO".to_string()),
            iupac_name: Some("ethanol".to_string()),
            common_name: Some("ethanol".to_string()),
            molecular_formula: Some("C2H6O".to_string()),
            description: "Chemical compound: ethanol".to_string(),
            pubchem_cid: Some(702),
            source: ResolutionSource::Database,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ChemicalRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
