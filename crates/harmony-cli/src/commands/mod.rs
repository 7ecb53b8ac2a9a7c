//! CLI command implementations.

pub mod enrich;
pub mod export;
pub mod infer;
pub mod status;
