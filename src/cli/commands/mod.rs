//! CLI command implementations.

mod ask;
mod config;
mod fetch;
mod reset;
mod serve;
mod status;

pub use ask::run_ask;
pub use config::run_config;
pub use fetch::run_fetch;
pub use reset::run_reset;
pub use serve::run_serve;
pub use status::run_status;
