//! chemviz-core — resolution and derivation pipeline.
//!
//! Takes free-form user text to a renderable 3D structure:
//!   1. Resolve text to a compound record (oracle, database, direct parse)
//!   2. Build a conformer (hydrogens, seeded embedding, refinement)
//!   3. Compute the descriptor set
//!
//! External capabilities sit behind the `StructureOracle`, `CompoundLookup`,
//! and `ToolkitAdapter` seams so every stage is testable offline.

pub mod builder;
pub mod config;
pub mod error;
pub mod lookup;
pub mod oracle;
pub mod properties;
pub mod record;
pub mod resolver;
pub mod toolkit;

pub use error::{CoreError, Result};
