//! Core types shared across the authoring backend

pub mod config;
pub mod error;
pub mod types;

pub use error::{ForgeError, Result};
