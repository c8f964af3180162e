//! Layered input resolution.
//!
//! Turns whatever the user typed (a name, a formula, chemical notation,
//! or nonsense) into a [`ChemicalRecord`] by trying the structure oracle,
//! then the reference database, then a direct notation parse. Failures are
//! encoded in the record; `resolve` itself never errors.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::lookup::CompoundLookup;
use crate::oracle::{parse_oracle_record, StructureOracle};
use crate::record::{ChemicalRecord, ResolutionSource};
use crate::toolkit::ToolkitAdapter;

/// Description for empty or whitespace-only input.
pub const NO_INPUT_MESSAGE: &str =
    "Please enter a chemical compound name, formula, or SMILES notation to begin.";

/// Description when every resolution stage failed.
pub const UNRESOLVED_MESSAGE: &str =
    "We couldn't interpret your input. Try a different chemical name, a molecular formula, or SMILES notation.";

pub struct InputResolver {
    oracle: Option<Arc<dyn StructureOracle>>,
    lookup: Arc<dyn CompoundLookup>,
    toolkit: Arc<dyn ToolkitAdapter>,
}

impl InputResolver {
    pub fn new(
        oracle: Option<Arc<dyn StructureOracle>>,
        lookup: Arc<dyn CompoundLookup>,
        toolkit: Arc<dyn ToolkitAdapter>,
    ) -> Self {
        InputResolver {
            oracle,
            lookup,
            toolkit,
        }
    }

    /// Resolve free text to a compound record.
    ///
    /// Stages run in order until one produces a notation that parses:
    /// oracle, database lookup, direct parse. All failures land in the
    /// returned record's description.
    pub async fn resolve(&self, text: &str) -> ChemicalRecord {
        let text = text.trim();
        if text.is_empty() {
            debug!("empty input, skipping resolution");
            return ChemicalRecord::unresolved(NO_INPUT_MESSAGE);
        }

        if let Some(record) = self.try_oracle(text).await {
            return record;
        }
        if let Some(record) = self.try_database(text).await {
            return record;
        }
        if let Some(record) = self.try_direct_parse(text) {
            return record;
        }

        debug!(input = text, "all resolution stages exhausted");
        ChemicalRecord::unresolved(UNRESOLVED_MESSAGE)
    }

    async fn try_oracle(&self, text: &str) -> Option<ChemicalRecord> {
        let oracle = match &self.oracle {
            Some(oracle) => oracle,
            None => {
                debug!("no structure oracle configured, trying database lookup");
                return None;
            }
        };

        let raw = match oracle.query(text).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("structure oracle failed: {err}");
                return None;
            }
        };
        let parsed = match parse_oracle_record(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("structure oracle answer rejected: {err}");
                return None;
            }
        };

        let smiles = match parsed.smiles.filter(|s| !s.trim().is_empty()) {
            Some(smiles) => smiles,
            None => {
                debug!("oracle offered no notation for {text:?}, trying database lookup");
                return None;
            }
        };
        if self.toolkit.parse(&smiles).is_err() {
            warn!("oracle notation {smiles:?} does not parse, trying database lookup");
            return None;
        }

        debug!(source = "oracle", input = text, "input resolved");
        Some(ChemicalRecord {
            smiles: Some(smiles),
            iupac_name: parsed.iupac_name,
            common_name: parsed.common_name,
            molecular_formula: parsed.molecular_formula,
            description: parsed
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| format!("Chemical compound: {text}")),
            pubchem_cid: parsed.pubchem_cid,
            source: ResolutionSource::Oracle,
        })
    }

    async fn try_database(&self, text: &str) -> Option<ChemicalRecord> {
        let hit = match self.lookup.lookup_by_name(text).await {
            Ok(hit) => hit,
            Err(err) => {
                debug!("database lookup failed: {err}, trying direct parse");
                return None;
            }
        };
        if self.toolkit.parse(&hit.smiles).is_err() {
            warn!("database notation {:?} does not parse, trying direct parse", hit.smiles);
            return None;
        }

        debug!(source = "database", cid = ?hit.cid, input = text, "input resolved");
        Some(ChemicalRecord {
            smiles: Some(hit.smiles),
            iupac_name: None,
            common_name: Some(text.to_string()),
            molecular_formula: hit.molecular_formula,
            description: format!("Chemical compound: {text}"),
            pubchem_cid: hit.cid,
            source: ResolutionSource::Database,
        })
    }

    fn try_direct_parse(&self, text: &str) -> Option<ChemicalRecord> {
        let mol = match self.toolkit.parse(text) {
            Ok(mol) => mol,
            Err(err) => {
                debug!("input is not chemical notation: {err}");
                return None;
            }
        };

        debug!(source = "direct_parse", input = text, "input resolved");
        Some(ChemicalRecord {
            smiles: Some(text.to_string()),
            iupac_name: None,
            common_name: None,
            molecular_formula: Some(self.toolkit.molecular_formula(&mol)),
            description: format!("SMILES notation: {text}"),
            pubchem_cid: None,
            source: ResolutionSource::DirectParse,
        })
    }
}
