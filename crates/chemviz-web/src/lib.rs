//! chemviz-web — HTTP surface for the resolution and derivation pipeline.
//!
//! Exposes:
//!   - POST /api/visualize — text in, record + 3D molblock + properties out
//!   - GET /health — liveness and capability probe

pub mod handlers;
pub mod router;
pub mod state;
