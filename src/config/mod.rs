// src/config/mod.rs

//! Configuration loading and validation for asyncdo.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Turn raw strings into checked, typed values (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{discover_config, load_and_validate, load_from_path};
pub use model::{ConfigFile, ControllerSection, DisplaySection, PoolSection, RawConfigFile};
pub use validate::parse_duration;
