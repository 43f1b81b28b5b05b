/// Database connection and table creation
pub mod database;

/// Settings from environment variables and the optional catalog.toml
pub mod settings;
