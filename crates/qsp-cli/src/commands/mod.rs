//! CLI command implementations.

pub mod angles;
pub mod common;
pub mod evolve;
pub mod gaussian;
pub mod prepare;
pub mod version;
