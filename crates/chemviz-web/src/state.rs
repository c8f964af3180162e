//! Shared application state for the web server.

use std::sync::Arc;

use chemviz_core::builder::ConformerBuilder;
use chemviz_core::config::Config;
use chemviz_core::lookup::{CompoundLookup, PubChemLookup};
use chemviz_core::oracle::{OpenAiOracle, StructureOracle};
use chemviz_core::properties::PropertyCalculator;
use chemviz_core::resolver::InputResolver;
use chemviz_core::toolkit::{RustToolkit, ToolkitAdapter};

/// Pipeline handles injected into every Axum handler. Built once at
/// startup; everything inside is read-only across queries.
pub struct AppState {
    pub resolver: InputResolver,
    pub builder: ConformerBuilder,
    pub calculator: PropertyCalculator,
    pub toolkit: Arc<dyn ToolkitAdapter>,
    pub oracle_enabled: bool,
}

impl AppState {
    /// Wire the production pipeline from configuration.
    ///
    /// The oracle credential comes from the environment; without it the
    /// resolver runs on database lookup and direct parsing alone.
    pub fn from_config(config: &Config) -> chemviz_core::Result<Self> {
        let toolkit: Arc<dyn ToolkitAdapter> = Arc::new(RustToolkit::new());
        let oracle = OpenAiOracle::from_config(&config.oracle)?
            .map(|oracle| Arc::new(oracle) as Arc<dyn StructureOracle>);
        let lookup: Arc<dyn CompoundLookup> = Arc::new(PubChemLookup::from_config(&config.lookup)?);
        let oracle_enabled = oracle.is_some();

        Ok(AppState {
            resolver: InputResolver::new(oracle, lookup, toolkit.clone()),
            builder: ConformerBuilder::new(toolkit.clone())
                .with_seed(config.toolkit.embed_seed)
                .with_max_iterations(config.toolkit.max_opt_iterations),
            calculator: PropertyCalculator::new(toolkit.clone()),
            toolkit,
            oracle_enabled,
        })
    }

    /// State over explicit capability handles, for tests and embedding.
    pub fn with_capabilities(
        oracle: Option<Arc<dyn StructureOracle>>,
        lookup: Arc<dyn CompoundLookup>,
    ) -> Self {
        let toolkit: Arc<dyn ToolkitAdapter> = Arc::new(RustToolkit::new());
        let oracle_enabled = oracle.is_some();

        AppState {
            resolver: InputResolver::new(oracle, lookup, toolkit.clone()),
            builder: ConformerBuilder::new(toolkit.clone()),
            calculator: PropertyCalculator::new(toolkit.clone()),
            toolkit,
            oracle_enabled,
        }
    }
}

pub type SharedState = Arc<AppState>;
