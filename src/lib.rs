// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod config;
pub mod enrich;
pub mod fetch;
pub mod normalize;
pub mod registry;
pub mod resolve;
pub mod similarity;
pub mod table;
