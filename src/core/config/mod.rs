pub mod data;
pub mod io;

pub use data::{Config, ConfigKeyError, MissingServerUrl};
pub use io::ConfigError;

#[cfg(test)]
pub mod tests;
