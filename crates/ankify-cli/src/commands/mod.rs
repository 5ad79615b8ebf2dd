//! Command implementations.

pub mod config;
pub mod generate;
pub mod usage;

pub use self::config::execute_config;
pub use self::generate::execute_generate;
pub use self::usage::execute_usage;
