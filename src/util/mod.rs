mod config;

pub use config::{describe_settings, load_settings, settings_path, Settings};
