/// Database connection and schema creation
pub mod database;

/// Application settings loaded from the environment
pub mod settings;

pub use settings::AppConfig;
