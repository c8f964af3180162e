//! HTTP handlers for all web routes.

pub mod health;
pub mod visualize;
