//! Template configuration
//!
//! A template is a TOML file naming the fields to fill, the optional image
//! slot, overlay drawing options and the output file name.

use anyhow::Context;
use overlay_core::{FieldMap, FieldSpec, ImageSlot, OverlayOptions, DEFAULT_OUTPUT_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Template file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Label -> field mapping, in drawing order
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Where the profile image goes, if the report has one
    #[serde(default)]
    pub image: Option<ImageSlot>,
    #[serde(default)]
    pub overlay: OverlayOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
        }
    }
}

fn default_filename() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

impl TemplateConfig {
    /// Load a template from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid template file: {}", path.display()))
    }

    /// Parse a template from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: TemplateConfig = toml::from_str(s).context("Failed to parse TOML template")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.output.filename.trim().is_empty() {
            anyhow::bail!("output.filename must not be empty");
        }
        if self.overlay.mask_width <= 0.0 {
            anyhow::bail!("overlay.mask_width must be positive");
        }
        if let Some(slot) = &self.image {
            slot.check_size().context("Invalid image slot")?;
        }
        self.field_map().map(|_| ())
    }

    /// Build the field map driving the overlay
    pub fn field_map(&self) -> anyhow::Result<FieldMap> {
        FieldMap::from_fields(self.fields.clone(), self.image.clone())
            .context("Invalid field list")
    }
}

/// Parse a `name=value` override from the command line
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in {:?}", s));
    }
    Ok((name.to_string(), value.to_string()))
}
