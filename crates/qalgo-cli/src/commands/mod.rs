//! CLI command implementations.

pub mod chsh;
pub mod common;
pub mod deutsch;
pub mod deutsch_jozsa;
pub mod factor;
pub mod phase;
pub mod simon;
pub mod superdense;
pub mod version;
