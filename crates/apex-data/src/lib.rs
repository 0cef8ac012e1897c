//! Client data for apex demo sites.
//!
//! This crate defines the client record read from the JSON data file and the
//! fallback values substituted for its optional fields.

pub mod client;
pub mod defaults;
pub mod loader;

pub use client::{ClientRecord, Project, Stat};
pub use defaults::{DemoDefaults, Defaults, LandingDefaults};
pub use loader::{duplicate_slugs, load_clients, parse_clients, LoadError};
