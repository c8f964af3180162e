//! Main pipeline endpoint: text in, record + 3D geometry + properties out.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use chemviz_chem::Molecule;
use chemviz_core::properties::PropertySet;
use chemviz_core::record::ChemicalRecord;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::state::SharedState;

const GEOMETRY_FAILED_MESSAGE: &str =
    "We identified your compound but could not build its 3D geometry.";

#[derive(Debug, Deserialize)]
pub struct VisualizeRequest {
    pub input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizeStatus {
    Resolved,
    Unresolved,
    EmbeddingFailed,
}

#[derive(Debug, Serialize)]
pub struct VisualizeResponse {
    pub status: VisualizeStatus,
    pub record: ChemicalRecord,
    pub properties: PropertySet,
    /// V2000 block with 3D coordinates, absent when no structure was built.
    pub molblock: Option<String>,
    /// CPK legend for the elements present in the built structure.
    pub atom_colors: BTreeMap<String, String>,
    /// User-facing explanation, absent on full success.
    pub message: Option<String>,
}

impl VisualizeResponse {
    fn unresolved(record: ChemicalRecord) -> Self {
        VisualizeResponse {
            status: VisualizeStatus::Unresolved,
            message: Some(record.description.clone()),
            record,
            properties: PropertySet::default(),
            molblock: None,
            atom_colors: BTreeMap::new(),
        }
    }

    fn embedding_failed(record: ChemicalRecord) -> Self {
        VisualizeResponse {
            status: VisualizeStatus::EmbeddingFailed,
            message: Some(GEOMETRY_FAILED_MESSAGE.to_string()),
            record,
            properties: PropertySet::default(),
            molblock: None,
            atom_colors: BTreeMap::new(),
        }
    }
}

fn cpk_legend(mol: &Molecule) -> BTreeMap<String, String> {
    let mut colors = BTreeMap::new();
    for atom in &mol.atoms {
        colors
            .entry(atom.element.symbol().to_string())
            .or_insert_with(|| atom.element.cpk_color().to_string());
    }
    colors
}

/// POST /api/visualize - resolve input and derive structure + properties
pub async fn visualize(
    State(state): State<SharedState>,
    Json(req): Json<VisualizeRequest>,
) -> Json<VisualizeResponse> {
    let record = state.resolver.resolve(&req.input).await;

    let Some(notation) = record.smiles.clone() else {
        return Json(VisualizeResponse::unresolved(record));
    };
    let title = record
        .common_name
        .clone()
        .or_else(|| record.iupac_name.clone())
        .unwrap_or_else(|| notation.clone());

    // Geometry and descriptors are CPU-bound; keep them off the reactor.
    let builder = state.builder.clone();
    let calculator = state.calculator.clone();
    let toolkit = state.toolkit.clone();
    let derived = tokio::task::spawn_blocking(move || {
        let mol = builder.build(&notation)?;
        let properties = calculator.compute(Some(&mol));
        let molblock = toolkit.serialize_graph(&mol, &title);
        let atom_colors = cpk_legend(&mol);
        Ok::<_, chemviz_core::CoreError>((properties, molblock, atom_colors))
    })
    .await;

    match derived {
        Ok(Ok((properties, molblock, atom_colors))) => Json(VisualizeResponse {
            status: VisualizeStatus::Resolved,
            record,
            properties,
            molblock: Some(molblock),
            atom_colors,
            message: None,
        }),
        Ok(Err(err)) => {
            warn!("structure derivation failed: {err}");
            Json(VisualizeResponse::embedding_failed(record))
        }
        Err(err) => {
            error!("structure derivation task failed: {err}");
            Json(VisualizeResponse::embedding_failed(record))
        }
    }
}
