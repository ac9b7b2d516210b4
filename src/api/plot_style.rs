use serde::{Deserialize, Serialize};

use crate::core::{AxisKey, Merge, Plot};
use crate::render::StyleContext;

use super::axis_linker::AxisLinks;

/// Render-time style of a plot.
///
/// The template plot is merged underneath every plot rendered with this
/// style; its highest pad id is the pad capacity unless set explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotStyle {
    template: Plot,
    context: StyleContext,
    links: AxisLinks,
    pad_capacity: Option<u8>,
}

/// Serializable part of a [`PlotStyle`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotStyleContract {
    #[serde(default)]
    pub template: Plot,
    #[serde(default)]
    pub context: StyleContext,
    #[serde(default, skip_serializing_if = "AxisLinks::is_empty")]
    pub links: AxisLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_capacity: Option<u8>,
}

impl PlotStyle {
    #[must_use]
    pub fn new(template: Plot) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: StyleContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_pad_capacity(mut self, capacity: u8) -> Self {
        self.pad_capacity = Some(capacity);
        self
    }

    /// Shares the `key` axis of `representative` with `members`.
    #[must_use]
    pub fn with_linked_axis(mut self, key: AxisKey, representative: u8, members: &[u8]) -> Self {
        self.links.link(key, representative, members.iter().copied());
        self
    }

    #[must_use]
    pub fn template(&self) -> &Plot {
        &self.template
    }

    #[must_use]
    pub fn context(&self) -> &StyleContext {
        &self.context
    }

    #[must_use]
    pub fn links(&self) -> &AxisLinks {
        &self.links
    }

    /// Number of pads this style can lay out; `None` means unlimited.
    #[must_use]
    pub fn capacity(&self) -> Option<u8> {
        self.pad_capacity.or_else(|| {
            let count = self.template.required_pad_count();
            (count > 0).then_some(count)
        })
    }

    /// `template ⊕ plot`, keeping the plot's identity.
    #[must_use]
    pub fn apply(&self, plot: &Plot) -> Plot {
        self.template.merge(plot)
    }

    #[must_use]
    pub fn to_contract(&self) -> PlotStyleContract {
        PlotStyleContract {
            template: self.template.clone(),
            context: self.context,
            links: self.links.clone(),
            pad_capacity: self.pad_capacity,
        }
    }
}

impl From<PlotStyleContract> for PlotStyle {
    fn from(contract: PlotStyleContract) -> Self {
        Self {
            template: contract.template,
            context: contract.context,
            links: contract.links,
            pad_capacity: contract.pad_capacity,
        }
    }
}
