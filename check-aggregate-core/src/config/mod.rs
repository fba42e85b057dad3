pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_from_file, DEFAULT_CONFIG_FILE};
pub use schema::{Config, FilterConfig, OutputConfig, SourceConfig, SourceKind};
pub use validation::validate_config;
