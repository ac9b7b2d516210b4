use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Axis, AxisKey, Merge, Plot};

/// Title offsets applied to the frame of a 2-D pad unless set explicitly.
const TITLE_OFFSETS_2D: [(AxisKey, f32); 3] =
    [(AxisKey::X, 1.1), (AxisKey::Y, 1.1), (AxisKey::Z, 1.6)];

/// Axis sharing table: `(axis, representative pad) -> linked pads`.
///
/// Serialized as a list of groups in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<LinkGroup>", from = "Vec<LinkGroup>")]
pub struct AxisLinks {
    groups: IndexMap<(AxisKey, u8), BTreeSet<u8>>,
}

/// Wire form of one link group.
#[derive(Serialize, Deserialize)]
pub struct LinkGroup {
    axis: AxisKey,
    representative: u8,
    members: BTreeSet<u8>,
}

impl From<AxisLinks> for Vec<LinkGroup> {
    fn from(links: AxisLinks) -> Self {
        links
            .groups
            .into_iter()
            .map(|((axis, representative), members)| LinkGroup {
                axis,
                representative,
                members,
            })
            .collect()
    }
}

impl From<Vec<LinkGroup>> for AxisLinks {
    fn from(groups: Vec<LinkGroup>) -> Self {
        let mut links = Self::default();
        for group in groups {
            links.link(group.axis, group.representative, group.members);
        }
        links
    }
}

impl AxisLinks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `members` share the `key` axis of `representative`.
    pub fn link(&mut self, key: AxisKey, representative: u8, members: impl IntoIterator<Item = u8>) {
        self.groups
            .entry((key, representative))
            .or_default()
            .extend(members);
    }

    #[must_use]
    pub fn with_link(mut self, key: AxisKey, representative: u8, members: &[u8]) -> Self {
        self.link(key, representative, members.iter().copied());
        self
    }

    /// Representative pads whose `key` axis is shared with `pad`, in
    /// declaration order.
    pub fn groups_for(&self, pad: u8, key: AxisKey) -> impl Iterator<Item = u8> + '_ {
        self.groups
            .iter()
            .filter(move |((group_key, representative), members)| {
                *group_key == key && *representative != pad && members.contains(&pad)
            })
            .map(|((_, representative), _)| *representative)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Final axis settings for the authoritative object of pad `pad_id`.
///
/// Starts from the pad's own axes (pad defaults merged in); range and title
/// of every linked representative pad that sets them win.
#[must_use]
pub fn resolve_frame_axes(
    plot: &Plot,
    pad_id: u8,
    links: &AxisLinks,
    is_2d: bool,
) -> BTreeMap<AxisKey, Axis> {
    let mut axes = plot
        .resolved_pad(pad_id)
        .map(|pad| pad.axes)
        .unwrap_or_default();

    for key in AxisKey::ALL {
        for representative in links.groups_for(pad_id, key) {
            let Some(source) = plot
                .resolved_pad(representative)
                .and_then(|pad| pad.axes.get(&key).cloned())
            else {
                continue;
            };
            let axis = axes.entry(key).or_default();
            if source.range.min.is_some() || source.range.max.is_some() {
                trace!(pad = pad_id, representative, axis = key.as_str(), "linked range");
                axis.range = axis.range.merge(&source.range);
            }
            if source.title.is_some() {
                axis.title = source.title;
            }
        }
    }

    if is_2d {
        for (key, offset) in TITLE_OFFSETS_2D {
            let axis = axes.entry(key).or_default();
            axis.title_text.offset.get_or_insert(offset);
        }
    }
    axes
}
