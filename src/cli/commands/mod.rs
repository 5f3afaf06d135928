//! CLI command implementations.

mod ask;
mod config;
mod doctor;
mod ingest;
pub mod serve;

pub use ask::run_ask;
pub use config::run_config;
pub use doctor::run_doctor;
pub use ingest::run_ingest;
pub use serve::run_serve;
