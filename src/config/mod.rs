//! Configuration management module
//!
//! Responsible for loading and managing client configuration, including environment variables, configuration files, etc.

pub mod client;
pub mod file;
pub mod settings;

pub use client::ClientConfig;
pub use file::FileConfig;
pub use settings::Settings;
