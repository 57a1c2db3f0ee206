//! mapart: command-line front end for `mapart-core`.
//!
//! Loads `config.yaml` and the persisted settings document, decodes PNG
//! input, and writes previews and structure files.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
