// src/config/mod.rs

//! Manifest loading for the `globdag` binary.
//!
//! - `model.rs`: TOML-backed data model.
//! - `loader.rs`: read a manifest from disk and turn it into an engine.
//! - `validate.rs`: checks that need only the manifest.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{build_engine, load_and_validate, load_from_path};
pub use model::{Manifest, RawManifest, SettingsSection, TaskEntry, manifest_root_dir};
pub use validate::validate_manifest;
