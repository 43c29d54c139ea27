mod config;
mod loader;

pub use config::{ConfigLoadError, ConfigLoader};
pub use loader::{BracketLoaderError, BracketRecord, BracketTableLoader, Jurisdiction, LoadedTables};
