//! Configuration loaded from `.titanvault.toml`.

pub mod settings;

pub use settings::Settings;
