//! Planforge - Content authoring backend for a plan-driven life simulation
//!
//! Models characters, places, factions and branching "plans" (scripted NPC
//! interactions), validates the JSON filter/modifier DSL attached to them,
//! renders canonical description labels, and exports self-describing
//! snapshots for the external game runtime.

pub mod core;
pub mod dsl;
pub mod export;
pub mod model;
pub mod ops;
pub mod render;
pub mod schema;
pub mod store;
