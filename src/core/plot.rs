use std::collections::BTreeMap;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::data::NAME_SEPARATOR;
use super::layout::{ColorIndex, Layout, styles};
use super::merge::Merge;
use super::pad::Pad;

/// Pad id reserved for the defaults merged into every other pad.
pub const PAD_DEFAULTS_ID: u8 = 0;

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_aspect_ratio: Option<bool>,
}

/// Top-level configuration of one multi-pad figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub(crate) name: String,
    pub(crate) group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) template_name: Option<String>,
    #[serde(default)]
    pub(crate) dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) fill: Layout,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) pads: BTreeMap<u8, Pad>,
}

impl Plot {
    #[must_use]
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            ..Self::default()
        }
    }

    /// Duplicates the whole pad tree under a new identity.
    #[must_use]
    pub fn clone_as(&self, name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_template_name(mut self, template_name: impl Into<String>) -> Self {
        self.template_name = Some(template_name.into());
        self
    }

    #[must_use]
    pub fn with_dimensions(mut self, width: i32, height: i32, fix_aspect_ratio: bool) -> Self {
        self.dimensions = Dimensions {
            width: Some(width),
            height: Some(height),
            fix_aspect_ratio: Some(fix_aspect_ratio),
        };
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: i32) -> Self {
        self.dimensions.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: i32) -> Self {
        self.dimensions.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_fix_aspect_ratio(mut self, fix: bool) -> Self {
        self.dimensions.fix_aspect_ratio = Some(fix);
        self
    }

    #[must_use]
    pub fn with_fill(mut self, color: ColorIndex, style: i16) -> Self {
        self.fill.color = Some(color);
        self.fill.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_transparent(mut self) -> Self {
        self.fill.style = Some(styles::FILL_HOLLOW);
        self
    }

    #[must_use]
    pub fn with_pad(mut self, id: u8, pad: Pad) -> Self {
        self.pads.insert(id, pad);
        self
    }

    #[must_use]
    pub fn with_pad_defaults(self, pad: Pad) -> Self {
        self.with_pad(PAD_DEFAULTS_ID, pad)
    }

    pub fn pad_mut(&mut self, id: u8) -> &mut Pad {
        self.pads.entry(id).or_default()
    }

    pub fn pad_defaults_mut(&mut self) -> &mut Pad {
        self.pad_mut(PAD_DEFAULTS_ID)
    }

    #[must_use]
    pub fn pad(&self, id: u8) -> Option<&Pad> {
        self.pads.get(&id)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn template_name(&self) -> Option<&str> {
        self.template_name.as_deref()
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[must_use]
    pub fn fill(&self) -> Layout {
        self.fill
    }

    /// `name_IN_group`, suffixed with `:category` when a category is set.
    #[must_use]
    pub fn unique_name(&self) -> String {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => {
                format!("{}{NAME_SEPARATOR}{}:{category}", self.name, self.group)
            }
            _ => format!("{}{NAME_SEPARATOR}{}", self.name, self.group),
        }
    }

    /// Highest renderable pad id; pad ids are 1-based.
    #[must_use]
    pub fn required_pad_count(&self) -> u8 {
        self.pads
            .keys()
            .copied()
            .filter(|id| *id != PAD_DEFAULTS_ID)
            .max()
            .unwrap_or(0)
    }

    /// Pad `id` with the pad defaults merged underneath.
    #[must_use]
    pub fn resolved_pad(&self, id: u8) -> Option<Pad> {
        let pad = self.pads.get(&id)?;
        Some(match self.pads.get(&PAD_DEFAULTS_ID) {
            Some(defaults) if id != PAD_DEFAULTS_ID => defaults.merge(pad),
            _ => pad.clone(),
        })
    }

    /// Renderable pad ids in ascending order.
    pub fn pad_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.pads
            .keys()
            .copied()
            .filter(|id| *id != PAD_DEFAULTS_ID)
    }
}

impl Add<&Plot> for &Plot {
    type Output = Plot;

    fn add(self, overlay: &Plot) -> Plot {
        self.merge(overlay)
    }
}

impl Add for Plot {
    type Output = Plot;

    fn add(self, overlay: Plot) -> Plot {
        self.merge(&overlay)
    }
}
