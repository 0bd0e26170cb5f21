//! Report editor
//!
//! Command-line front end for `overlay-core`: fills a TOML template into a
//! report PDF using an extracted word stream.

pub mod commands;
pub mod config;

pub use commands::{LabelMatches, OverlayArgs, RegenerateArgs, RegenerateReport};
pub use config::{parse_assignment, OutputConfig, TemplateConfig};
