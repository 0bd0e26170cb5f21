//! Declarative label -> field mapping
//!
//! A [`FieldMap`] describes one document template: which anchor label marks
//! each logical field, the value to draw there, and optionally where an image
//! goes. One pipeline serves every template.

use crate::error::OverlayError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    /// Logical field name, e.g. "name"
    pub name: String,
    /// Anchor label exactly as rendered, e.g. "Name:"
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Anchor for the optional image overlay, sized in points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageSlot {
    pub label: String,
    #[serde(default = "default_image_extent")]
    pub width: f64,
    #[serde(default = "default_image_extent")]
    pub height: f64,
}

/// Largest image slot side in points
pub const MAX_IMAGE_EXTENT: f64 = 2000.0;

fn default_image_extent() -> f64 {
    100.0
}

impl ImageSlot {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            width: default_image_extent(),
            height: default_image_extent(),
        }
    }

    /// Reject sizes that are not finite, not positive or above [`MAX_IMAGE_EXTENT`]
    pub fn check_size(&self) -> Result<(), OverlayError> {
        let valid = |v: f64| v.is_finite() && v > 0.0 && v <= MAX_IMAGE_EXTENT;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(OverlayError::AssetError(format!(
                "Image slot {}x{} must be positive and at most {} pt per side",
                self.width, self.height, MAX_IMAGE_EXTENT
            )))
        }
    }

    /// Pixel dimensions the asset is resampled to (one pixel per point),
    /// capped at [`MAX_IMAGE_EXTENT`] per side
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |v: f64| v.round().clamp(1.0, MAX_IMAGE_EXTENT) as u32;
        (px(self.width), px(self.height))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldMap {
    #[serde(default)]
    fields: Vec<FieldSpec>,
    #[serde(default)]
    image: Option<ImageSlot>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from specs, rejecting duplicate field names
    pub fn from_fields(
        fields: Vec<FieldSpec>,
        image: Option<ImageSlot>,
    ) -> Result<Self, OverlayError> {
        let mut map = Self { fields: Vec::new(), image };
        for field in fields {
            map.push(field)?;
        }
        Ok(map)
    }

    pub fn push(&mut self, field: FieldSpec) -> Result<(), OverlayError> {
        if self.get(&field.name).is_some() {
            return Err(OverlayError::DuplicateField(field.name));
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn with_field(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, OverlayError> {
        self.push(FieldSpec::new(name, label, value))?;
        Ok(self)
    }

    pub fn with_image(mut self, slot: ImageSlot) -> Self {
        self.image = Some(slot);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn image_slot(&self) -> Option<&ImageSlot> {
        self.image.as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), OverlayError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| OverlayError::UnknownField(name.to_string()))?;
        field.value = value.into();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
