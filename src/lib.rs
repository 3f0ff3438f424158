//! lakegate - quality gate and promotion engine for a two-layer data lake
//!
//! Staged (QA) batches are validated against per-entity rules and against
//! their parents' promoted batches, then cleaned and published to the
//! promoted (PROD) layer in dependency order.

pub mod cli;
pub mod config;
pub mod observability;
pub mod promotion;
pub mod quality;
pub mod record;
pub mod schema;
pub mod snapshot;
