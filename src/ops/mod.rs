//! Data-maintenance operations invoked from the command line.

pub mod homes;
pub mod population;
pub mod relationships;

pub use homes::build_homes;
pub use population::update_population;
pub use relationships::{get_opinion, seed_relationships};
